//! The card tree shared by every renderer.

use serde::Serialize;

/// Background gradient of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Emerald,
    Blue,
    Violet,
    Orange,
    Pink,
    Gray,
    Green,
    Slate,
}

impl Theme {
    /// Tailwind gradient stops.
    pub fn gradient(&self) -> &'static str {
        match self {
            Self::Emerald => "from-emerald-500 via-teal-500 to-cyan-500",
            Self::Blue => "from-blue-500 via-indigo-500 to-purple-500",
            Self::Violet => "from-violet-500 via-purple-500 to-fuchsia-500",
            Self::Orange => "from-orange-500 via-amber-500 to-yellow-500",
            Self::Pink => "from-pink-500 via-rose-500 to-red-500",
            Self::Gray => "from-gray-500 via-slate-500 to-zinc-500",
            Self::Green => "from-green-500 via-emerald-500 to-teal-500",
            Self::Slate => "from-slate-600 via-gray-600 to-zinc-600",
        }
    }
}

/// Icons, named after their lucide counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    User,
    Mail,
    Briefcase,
    Calendar,
    DollarSign,
    CheckCircle,
    FileText,
    Clock,
    Coffee,
    TrendingUp,
}

impl Icon {
    pub fn lucide_name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Mail => "mail",
            Self::Briefcase => "briefcase",
            Self::Calendar => "calendar",
            Self::DollarSign => "dollar-sign",
            Self::CheckCircle => "circle-check",
            Self::FileText => "file-text",
            Self::Clock => "clock",
            Self::Coffee => "coffee",
            Self::TrendingUp => "trending-up",
        }
    }
}

/// Status pill in a card header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub label: String,
    /// Check mark before the label
    pub checked: bool,
    /// Pulsing dot before the label
    pub live: bool,
}

/// Size of a tile's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Plain,
    Medium,
    Large,
    XLarge,
}

impl Emphasis {
    pub(crate) fn classes(&self) -> &'static str {
        match self {
            Self::Plain => "text-white text-sm",
            Self::Medium => "text-white text-sm font-medium",
            Self::Large => "text-white text-lg font-semibold",
            Self::XLarge => "text-white text-xl font-semibold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub text: String,
    pub aside: String,
}

/// One element of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// The root: a themed panel around its children
    Card {
        kind: &'static str,
        theme: Theme,
        children: Vec<Node>,
    },
    Header {
        icon: Icon,
        title: String,
        subtitle: String,
        badge: Badge,
    },
    /// Full-width label/value strip
    Banner { label: String, value: String },
    /// Full-width line of text behind an icon
    Line { icon: Icon, text: String },
    /// Tiles side by side; `responsive` grids stack on narrow screens
    Grid { responsive: bool, children: Vec<Node> },
    Tile {
        icon: Option<Icon>,
        label: String,
        value: String,
        detail: Option<String>,
        emphasis: Emphasis,
    },
    /// Large centered figure
    Highlight { label: String, value: String, unit: String },
    List {
        icon: Icon,
        label: String,
        rows: Vec<ListRow>,
        /// Shown instead of the rows when there are none
        empty: String,
    },
    Note { label: String, value: String },
    Footer { text: String },
}

impl Node {
    pub(crate) fn tile(icon: Option<Icon>, label: &str, value: impl Into<String>, emphasis: Emphasis) -> Self {
        Self::Tile {
            icon,
            label: label.to_string(),
            value: value.into(),
            detail: None,
            emphasis,
        }
    }

    /// Depth-first search for the first tile with this label.
    pub fn find_tile(&self, label: &str) -> Option<&str> {
        match self {
            Self::Tile { label: l, value, .. } if l == label => Some(value),
            Self::Card { children, .. } | Self::Grid { children, .. } => {
                children.iter().find_map(|c| c.find_tile(label))
            }
            _ => None,
        }
    }
}
