use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of tabbed panels on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Upload,
    Summary,
    Figures,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Upload, Panel::Summary, Panel::Figures];

    /// Element id of the panel container
    pub fn element_id(self) -> &'static str {
        match self {
            Panel::Upload => "upload-tab",
            Panel::Summary => "summary-tab",
            Panel::Figures => "figures-tab",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPanel(pub String);

impl fmt::Display for UnknownPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown panel `{}`", self.0)
    }
}

impl std::error::Error for UnknownPanel {}

impl FromStr for Panel {
    type Err = UnknownPanel;

    /// Accepts both the element id (`summary-tab`) and the bare name (`summary`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Panel::ALL
            .into_iter()
            .find(|panel| {
                panel.element_id() == name
                    || name.eq_ignore_ascii_case(panel.element_id().trim_end_matches("-tab"))
            })
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_element_ids_and_names() {
        assert_eq!("summary-tab".parse::<Panel>().unwrap(), Panel::Summary);
        assert_eq!("figures".parse::<Panel>().unwrap(), Panel::Figures);
        assert_eq!("Upload".parse::<Panel>().unwrap(), Panel::Upload);
    }

    #[test]
    fn rejects_unknown_ids() {
        let err = "settings-tab".parse::<Panel>().unwrap_err();
        assert_eq!(err, UnknownPanel("settings-tab".to_string()));
    }
}
