//! Two-way lookup between postal abbreviations and full state names.

/// The 50 states plus the District of Columbia.
pub const STATES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

pub fn full_name(abbr: &str) -> Option<&'static str> {
    let abbr = abbr.trim();
    STATES.iter().find(|(a, _)| *a == abbr).map(|(_, name)| *name)
}

pub fn abbreviation(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATES.iter().find(|(_, n)| *n == name).map(|(abbr, _)| *abbr)
}

/// How the `state` column of a dataset is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKeyFormat {
    Abbreviation,
    FullName,
}

impl StateKeyFormat {
    /// Decided once per dataset from the first row; mixed columns are not detected.
    pub fn detect(first_value: &str) -> Self {
        if full_name(first_value).is_some() {
            StateKeyFormat::Abbreviation
        } else {
            StateKeyFormat::FullName
        }
    }

    /// Returns `(full name, abbreviation)` for a raw cell.
    pub fn resolve(self, raw: &str) -> (Option<String>, Option<String>) {
        let raw = raw.trim();
        match self {
            StateKeyFormat::Abbreviation => (
                full_name(raw).map(str::to_string),
                Some(raw.to_string()).filter(|s| !s.is_empty()),
            ),
            StateKeyFormat::FullName => (
                Some(raw.to_string()).filter(|s| !s.is_empty()),
                abbreviation(raw).map(str::to_string),
            ),
        }
    }
}
