use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(VolunteerId);
id_newtype!(HealthCenterId);

/// Region a volunteer is assigned to.
///
/// The form offers the three known regions. Any other name the store holds is
/// kept verbatim in `Other` so it survives an edit of unrelated fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Department {
    Lima,
    Cusco,
    Arequipa,
    Other(String),
}

impl Department {
    pub const ALL: [Department; 3] = [Department::Lima, Department::Cusco, Department::Arequipa];

    pub fn as_str(&self) -> &str {
        match self {
            Department::Lima => "Lima",
            Department::Cusco => "Cusco",
            Department::Arequipa => "Arequipa",
            Department::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Department::Other(_))
    }

    /// Maps a stored name onto a known region, keeping anything else as-is.
    pub fn from_wire(raw: &str) -> Department {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(department = raw, "keeping unrecognised department");
            Department::Other(raw.to_string())
        })
    }

    /// Wire decoder for `departamento`: null and empty decode as unset.
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Department>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .filter(|name| !name.trim().is_empty())
            .map(|name| Department::from_wire(&name)))
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Department {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Department {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Department::from_wire(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown department '{0}'")]
pub struct UnknownDepartment(pub String);

/// Only the known regions parse; free text is refused.
impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|department| department.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

/// Integer role code carried by user records. Only `0` has a meaning here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleCode(pub i64);

impl RoleCode {
    pub const VOLUNTEER: RoleCode = RoleCode(0);

    pub fn is_volunteer(&self) -> bool {
        *self == Self::VOLUNTEER
    }

    pub fn label(&self) -> String {
        if self.is_volunteer() {
            "Volunteer".to_string()
        } else {
            self.0.to_string()
        }
    }
}

/// Plaintext password exactly as the record store hands it out.
///
/// The store exposes and accepts it in the clear and the roster lists it
/// verbatim. `Debug` is redacted so it stays out of logs; `Display` and the
/// wire form are untouched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
