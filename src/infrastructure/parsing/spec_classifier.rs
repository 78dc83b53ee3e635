//! Spec classifier
//!
//! Walks the comma-separated tokens of a specs block and assigns each token's
//! values to typed fields. How a new value interacts with an existing one is
//! decided per field by [`ConflictPolicy`], looked up in [`FIELD_POLICIES`].

use tracing::trace;

use super::patterns::{DIGITS_3_6, RAM_HINT, RESOLUTION, SIM_COUNT, SPEC_CAPACITY_GB, SPEC_SEPARATOR, STORAGE};
use super::title_segmenter::MainSegment;
use crate::domain::parsed_attributes::ParsedAttributes;
use crate::infrastructure::extractors::{extract_battery, extract_camera_list, extract_int_any, has_feature};

const PROCESSOR_MARKERS: [&str; 2] = ["ядер", "ггц"];
const CAMERA_MARKERS: [&str; 2] = ["мп", "mp"];

/// Field targeted by a spec token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    Processor,
    Sim,
    /// RAM from a token carrying an explicit RAM hint (`операт`, `ram`)
    RamExplicit,
    /// RAM inferred from a bare capacity under the guard ceiling
    RamGuarded,
    ScreenType,
    Resolution,
    Cameras,
    BatteryMah,
    HasNfc,
    Has5g,
}

/// What happens when a field that already holds a value receives another one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Keep the first value seen
    FirstWins,
    /// Every new value replaces the previous one
    LastWins,
    /// Flags: once set, never cleared
    StickyOr,
    /// Set only while empty, and only for values that passed a guard
    GuardedSet,
}

pub const FIELD_POLICIES: [(SpecField, ConflictPolicy); 10] = [
    (SpecField::Processor, ConflictPolicy::FirstWins),
    (SpecField::Sim, ConflictPolicy::FirstWins),
    (SpecField::RamExplicit, ConflictPolicy::LastWins),
    (SpecField::RamGuarded, ConflictPolicy::GuardedSet),
    (SpecField::ScreenType, ConflictPolicy::LastWins),
    (SpecField::Resolution, ConflictPolicy::LastWins),
    (SpecField::Cameras, ConflictPolicy::LastWins),
    (SpecField::BatteryMah, ConflictPolicy::LastWins),
    (SpecField::HasNfc, ConflictPolicy::StickyOr),
    (SpecField::Has5g, ConflictPolicy::StickyOr),
];

impl SpecField {
    #[must_use]
    pub fn policy(self) -> ConflictPolicy {
        FIELD_POLICIES
            .iter()
            .find(|(field, _)| *field == self)
            .map_or(ConflictPolicy::FirstWins, |(_, policy)| *policy)
    }
}

impl ConflictPolicy {
    /// Whether a new value may be written into a slot in the given state
    #[must_use]
    pub const fn admits(self, occupied: bool) -> bool {
        match self {
            Self::LastWins => true,
            Self::FirstWins | Self::StickyOr | Self::GuardedSet => !occupied,
        }
    }

    /// Merge a candidate into an optional slot; returns whether the slot changed
    pub fn merge<T>(self, slot: &mut Option<T>, candidate: T) -> bool {
        if self.admits(slot.is_some()) {
            *slot = Some(candidate);
            true
        } else {
            false
        }
    }

    /// Merge a detected flag
    pub fn merge_flag(self, flag: &mut bool, hit: bool) {
        match self {
            Self::StickyOr => *flag |= hit,
            Self::LastWins => *flag = hit,
            Self::FirstWins | Self::GuardedSet => {
                if !*flag {
                    *flag = hit;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpecClassifier {
    screen_types: Vec<String>,
    ram_guard_gb: u32,
}

impl SpecClassifier {
    pub fn new(screen_types: &[String], ram_guard_gb: u32) -> Self {
        Self {
            screen_types: screen_types.iter().map(|s| s.to_lowercase()).collect(),
            ram_guard_gb,
        }
    }

    /// Comma-separated, trimmed, non-empty tokens of a specs block
    pub fn tokens(specs_raw: &str) -> Vec<&str> {
        SPEC_SEPARATOR
            .split(specs_raw)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Classify every token of the specs block, in order of appearance
    pub fn classify(&self, specs_raw: &str, attrs: &mut ParsedAttributes) {
        for token in Self::tokens(specs_raw) {
            self.classify_token(token, attrs);
        }
    }

    fn classify_token(&self, token: &str, attrs: &mut ParsedAttributes) {
        let lowered = token.to_lowercase();

        // A processor token is not classified any further.
        if PROCESSOR_MARKERS.iter().any(|m| lowered.contains(m)) {
            SpecField::Processor.policy().merge(&mut attrs.processor, token.to_string());
            trace!("Spec token '{}' -> processor", token);
            return;
        }

        if SPEC_CAPACITY_GB.is_match(token) {
            if let Some(value) = extract_int_any(token) {
                if RAM_HINT.is_match(token) {
                    SpecField::RamExplicit.policy().merge(&mut attrs.ram_gb, value);
                } else if value <= self.ram_guard_gb {
                    SpecField::RamGuarded.policy().merge(&mut attrs.ram_gb, value);
                }
            }
        }

        if SIM_COUNT.is_match(token) {
            SpecField::Sim.policy().merge(&mut attrs.sim, token.to_string());
        }

        if self.screen_types.iter().any(|screen| lowered.contains(screen.as_str())) {
            SpecField::ScreenType.policy().merge(&mut attrs.screen_type, token.to_string());
        }

        if RESOLUTION.is_match(token) {
            SpecField::Resolution.policy().merge(&mut attrs.resolution, token.to_string());
        }

        if CAMERA_MARKERS.iter().any(|m| lowered.contains(m)) {
            let cameras = extract_camera_list(token);
            if !cameras.is_empty() && SpecField::Cameras.policy().admits(!attrs.camera_list_mp.is_empty()) {
                attrs.set_cameras(cameras);
            }
        }

        if DIGITS_3_6.is_match(token) {
            if let Some(battery) = extract_battery(token).filter(|mah| *mah > 0) {
                SpecField::BatteryMah.policy().merge(&mut attrs.battery_mah, battery);
            }
        }

        SpecField::HasNfc.policy().merge_flag(&mut attrs.has_nfc, has_feature(token, &["nfc"]));
        SpecField::Has5g.policy().merge_flag(&mut attrs.has_5g, has_feature(token, &["5g"]));

        trace!("Spec token '{}' classified", token);
    }

    /// Post-pass: RAM fallback from the main segment, then camera count/max.
    ///
    /// The fallback skips the capacity already consumed as storage.
    pub fn finish(&self, main: &MainSegment, attrs: &mut ParsedAttributes) {
        if attrs.ram_gb.is_none() {
            let fallback = STORAGE
                .captures_iter(&main.text)
                .filter(|caps| caps.get(0).map(|m| m.range()) != main.storage_span)
                .find_map(|caps| caps[1].parse::<u32>().ok());

            if let Some(value) = fallback.filter(|value| *value <= self.ram_guard_gb) {
                SpecField::RamGuarded.policy().merge(&mut attrs.ram_gb, value);
            }
        }

        attrs.derive_camera_counts();
    }
}
