/// Every mode code the stats fetch is restricted to.
pub const RECOGNIZED_MODES: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 8];

const CLASSIC_MODES: [u8; 4] = [0, 1, 2, 3];
// 7 would be relax mania, which does not exist. 8 is autopilot standard.
const RELAX_MODES: [u8; 4] = [4, 5, 6, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFamily {
    Classic,
    Relax,
}

impl ModeFamily {
    pub const ALL: [ModeFamily; 2] = [ModeFamily::Classic, ModeFamily::Relax];

    pub fn of(mode: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.modes().contains(&mode))
    }

    pub fn modes(self) -> &'static [u8] {
        match self {
            ModeFamily::Classic => &CLASSIC_MODES,
            ModeFamily::Relax => &RELAX_MODES,
        }
    }
}

pub fn is_recognized(mode: u8) -> bool {
    RECOGNIZED_MODES.contains(&mode)
}

/// Renders `RECOGNIZED_MODES` as a SQL list, e.g. `(0, 1, 2, 3, 4, 5, 6, 8)`.
pub fn mode_in_clause() -> String {
    let codes = RECOGNIZED_MODES
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>();
    format!("({})", codes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_disjoint_and_cover_recognized_modes() {
        for mode in RECOGNIZED_MODES {
            assert!(ModeFamily::of(mode).is_some(), "mode {mode} unclassified");
        }
        for mode in ModeFamily::Classic.modes() {
            assert!(!ModeFamily::Relax.modes().contains(mode));
        }
        let total = ModeFamily::Classic.modes().len() + ModeFamily::Relax.modes().len();
        assert_eq!(total, RECOGNIZED_MODES.len());
    }

    #[test]
    fn unknown_modes_have_no_family() {
        assert_eq!(ModeFamily::of(7), None);
        assert_eq!(ModeFamily::of(9), None);
        assert!(!is_recognized(7));
    }

    #[test]
    fn in_clause_lists_every_mode() {
        assert_eq!(mode_in_clause(), "(0, 1, 2, 3, 4, 5, 6, 8)");
    }
}
