use serde::{Deserialize, Serialize};

/// Attributes inferred from a product title.
///
/// Every field starts absent (or `false`) and is only filled by a matching rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedAttributes {
    pub diagonal_in: Option<f64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage_gb: Option<u32>,
    pub color: Option<String>,
    pub ram_gb: Option<u32>,
    pub battery_mah: Option<u32>,
    pub screen_type: Option<String>,
    pub resolution: Option<String>,
    pub camera_list_mp: Vec<u32>,
    pub num_cameras: Option<u32>,
    pub max_camera_mp: Option<u32>,
    pub has_nfc: bool,
    pub has_5g: bool,
    pub specs_raw: Option<String>,
    pub processor: Option<String>,
    pub sim: Option<String>,
}

impl ParsedAttributes {
    /// Replace the camera list together with its derived count and maximum.
    pub fn set_cameras(&mut self, cameras: Vec<u32>) {
        self.num_cameras = Some(cameras.len() as u32);
        self.max_camera_mp = cameras.iter().copied().max();
        self.camera_list_mp = cameras;
    }

    /// Fill a missing camera count or maximum from the list.
    pub fn derive_camera_counts(&mut self) {
        if self.camera_list_mp.is_empty() {
            return;
        }
        if self.num_cameras.is_none() {
            self.num_cameras = Some(self.camera_list_mp.len() as u32);
        }
        if self.max_camera_mp.is_none() {
            self.max_camera_mp = self.camera_list_mp.iter().copied().max();
        }
    }
}
