use unicode_bidi::BidiInfo;

/// Resolved direction of a paragraph, line or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Direction of a bidi embedding level: even levels are left-to-right.
    pub fn from_level(level: u8) -> Self {
        if level % 2 == 0 {
            Direction::Ltr
        } else {
            Direction::Rtl
        }
    }

    /// The lowest embedding level with this direction.
    pub fn level(self) -> u8 {
        match self {
            Direction::Ltr => 0,
            Direction::Rtl => 1,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }

    pub fn is_ltr(self) -> bool {
        self == Direction::Ltr
    }

    /// Base direction of the first paragraph of `text` per UAX #9, falling
    /// back to left-to-right when the text has no strong characters.
    pub fn detect(text: &str) -> Self {
        let info = BidiInfo::new(text, None);
        info.paragraphs
            .first()
            .map(|para| Direction::from_level(para.level.number()))
            .unwrap_or_default()
    }
}
