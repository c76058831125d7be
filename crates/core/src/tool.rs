//! The closed set of agent actions and the tool catalogue shown to the model.
//!
//! The catalogue is rendered verbatim into the system prompt, and the
//! [`Action`] enum is what the dispatcher matches on. Adding a tool means
//! adding a variant, a catalogue entry, and a handler; the compiler flags
//! every `match` that needs updating.

use serde::Serialize;

/// One parameter in a tool's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A tool as presented to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

const fn required(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        required: true,
    }
}

/// The fixed, ordered tool catalogue.
pub static CATALOGUE: [ToolDescriptor; 4] = [
    ToolDescriptor {
        name: "extract_location",
        description: "Extract location information (name, city, country) from a text description using NLP. Use this when you have a text that contains location information.",
        params: &[required(
            "text",
            "The text to extract location information from",
        )],
    },
    ToolDescriptor {
        name: "search_web",
        description: "Search the web for information about a location. Use this when you need more details about a place or when location extraction is incomplete.",
        params: &[required(
            "query",
            "The search query to find location information",
        )],
    },
    ToolDescriptor {
        name: "get_coordinates",
        description: "Get GPS coordinates (latitude, longitude) for a location. Use this when you have the location name, city, and country.",
        params: &[
            required("name", "The name of the place/landmark"),
            required("city", "The city where the place is located"),
            required("country", "The country where the place is located"),
        ],
    },
    ToolDescriptor {
        name: "final_answer",
        description: "Provide the final answer when you have all the location information (name, city, country, coordinates). Use this to complete the task.",
        params: &[
            required("name", "The name of the place/landmark"),
            required("city", "The city"),
            required("country", "The country"),
            required("latlong", "The coordinates in format 'lat, long'"),
        ],
    },
];

impl ToolDescriptor {
    /// Render as a catalogue entry for the system prompt.
    pub fn render(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.description))
            .collect::<Vec<_>>()
            .join(", ");
        format!("- {}: {}\n  Parameters: {}", self.name, self.description, params)
    }

    /// Names of the required parameters.
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }
}

/// Render the whole catalogue, one block per tool separated by a blank line.
pub fn render_catalogue() -> String {
    CATALOGUE
        .iter()
        .map(ToolDescriptor::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// An action chosen by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ExtractLocation,
    SearchWeb,
    GetCoordinates,
    /// The terminal action: its parameters are the result of the run.
    FinalAnswer,
    /// Anything not in the catalogue, kept verbatim for the observation.
    Unknown(String),
}

impl Action {
    /// Classify an action name. Matching ignores ASCII case.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "extract_location" => Self::ExtractLocation,
            "search_web" => Self::SearchWeb,
            "get_coordinates" => Self::GetCoordinates,
            "final_answer" => Self::FinalAnswer,
            _ => Self::Unknown(name.trim().to_string()),
        }
    }

    /// Canonical tool name.
    pub fn name(&self) -> &str {
        match self {
            Self::ExtractLocation => CATALOGUE[0].name,
            Self::SearchWeb => CATALOGUE[1].name,
            Self::GetCoordinates => CATALOGUE[2].name,
            Self::FinalAnswer => CATALOGUE[3].name,
            Self::Unknown(name) => name,
        }
    }

    /// Whether this action ends the loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FinalAnswer)
    }

    /// The catalogue entry, if this is a known tool.
    pub fn descriptor(&self) -> Option<&'static ToolDescriptor> {
        CATALOGUE.iter().find(|d| d.name == self.name())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
