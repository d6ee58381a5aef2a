use serde::{Deserialize, Serialize};

/// One statistic card in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub value: String,
    pub description: String,
    pub icon_ref: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            description: String::new(),
            icon_ref: String::new(),
            color: "#000000".into(),
            link: None,
            org: None,
        }
    }

    /// Descriptive label read out alongside the position of the item.
    pub fn label(&self) -> String {
        format!("{}: {}", self.title, self.value)
    }
}

/// Viewport classes reported by the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Narrow,
    Medium,
    #[default]
    Wide,
}

impl Breakpoint {
    /// Number of cards shown side by side at this breakpoint.
    pub const fn window_size(self) -> usize {
        match self {
            Self::Narrow => 1,
            Self::Medium => 2,
            Self::Wide => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Medium => "medium",
            Self::Wide => "wide",
        }
    }
}
