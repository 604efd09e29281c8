// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reveal stages and what each one shows.

use serde::{Deserialize, Serialize};

/// One step of the reveal ladder
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Stage {
    /// Envelope closed, nothing revealed yet
    #[default]
    Sealed,
    /// Envelope flap opening
    EnvelopeOpen,
    /// Bouquet appears
    Bouquet,
    /// Photo and stamp pop up
    Photo,
    /// Letter slides in
    Letter,
}

impl Stage {
    /// All stages in reveal order
    pub const ALL: [Stage; 5] = [
        Stage::Sealed,
        Stage::EnvelopeOpen,
        Stage::Bouquet,
        Stage::Photo,
        Stage::Letter,
    ];

    /// Numeric index, 0 through 4
    pub fn index(self) -> u8 {
        match self {
            Stage::Sealed => 0,
            Stage::EnvelopeOpen => 1,
            Stage::Bouquet => 2,
            Stage::Photo => 3,
            Stage::Letter => 4,
        }
    }

    /// Stage for a numeric index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// The stage that follows this one
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Whether this is the last stage
    pub fn is_terminal(self) -> bool {
        self == Stage::Letter
    }

    /// Narration may only start once the letter is showing
    pub fn narration_eligible(self) -> bool {
        self.is_terminal()
    }

    /// Get display name for this stage
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Sealed => "Sealed",
            Stage::EnvelopeOpen => "Envelope opens",
            Stage::Bouquet => "Bouquet",
            Stage::Photo => "Photo",
            Stage::Letter => "Letter",
        }
    }

    /// Elements eligible to render at this stage
    pub fn visibility(self) -> StageVisibility {
        StageVisibility::at(self)
    }
}

/// Visual elements eligible to render at a given stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageVisibility {
    /// Envelope body
    pub envelope: bool,
    /// Envelope flap folded back
    pub envelope_flap_open: bool,
    /// Flower bouquet
    pub bouquet: bool,
    /// Photo frame
    pub photo: bool,
    /// Stamp on the photo
    pub stamp: bool,
    /// Letter with the message
    pub letter: bool,
    /// Narration play/pause/stop controls
    pub narration_controls: bool,
    /// Button returning to the builder
    pub back_button: bool,
}

impl StageVisibility {
    /// Compute visibility for a stage
    pub fn at(stage: Stage) -> Self {
        Self {
            envelope: stage <= Stage::EnvelopeOpen,
            envelope_flap_open: stage >= Stage::EnvelopeOpen,
            bouquet: stage >= Stage::Bouquet,
            photo: stage >= Stage::Photo,
            stamp: stage >= Stage::Photo,
            letter: stage >= Stage::Letter,
            narration_controls: stage.narration_eligible(),
            back_button: stage >= Stage::Letter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_index(stage.index()), Some(stage));
        }
        assert_eq!(Stage::from_index(5), None);
    }

    #[test]
    fn test_next_never_skips() {
        let mut stage = Stage::default();
        let mut seen = vec![stage.index()];
        while let Some(next) = stage.next() {
            stage = next;
            seen.push(stage.index());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_visibility_ladder() {
        let sealed = Stage::Sealed.visibility();
        assert!(sealed.envelope);
        assert!(!sealed.envelope_flap_open);
        assert!(!sealed.bouquet);

        let open = Stage::EnvelopeOpen.visibility();
        assert!(open.envelope && open.envelope_flap_open);

        let bouquet = Stage::Bouquet.visibility();
        assert!(!bouquet.envelope);
        assert!(bouquet.bouquet && !bouquet.photo);

        let photo = Stage::Photo.visibility();
        assert!(photo.photo && photo.stamp && !photo.letter);
        assert!(!photo.narration_controls);

        let letter = Stage::Letter.visibility();
        assert!(letter.bouquet && letter.photo && letter.letter);
        assert!(letter.narration_controls && letter.back_button);
    }

    #[test]
    fn test_narration_only_at_terminal_stage() {
        let eligible: Vec<Stage> = Stage::ALL
            .into_iter()
            .filter(|s| s.narration_eligible())
            .collect();
        assert_eq!(eligible, vec![Stage::Letter]);
    }
}
