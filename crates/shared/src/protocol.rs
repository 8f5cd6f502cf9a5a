use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Credential, Department, HealthCenterId, RoleCode, VolunteerId};

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Text column that the store may hand out as null or as a bare number
/// (national ids often arrive numeric).
fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(TextOrNumber::Text(text)) => text,
        Some(TextOrNumber::Integer(number)) => number.to_string(),
        Some(TextOrNumber::Float(number)) => number.to_string(),
    })
}

/// Health center as embedded in a user record (`CentroSalud`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCenterRef {
    #[serde(rename = "idCentroSalud")]
    pub id: HealthCenterId,
    #[serde(rename = "nombreSalud", default, deserialize_with = "string_or_null")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCenterRecord {
    #[serde(rename = "idCentroSalud")]
    pub id: HealthCenterId,
    #[serde(rename = "nombreSalud", default, deserialize_with = "string_or_null")]
    pub name: String,
}

/// A user record as listed by the record store.
///
/// The assigned health center shows up under two keys: `health_center_id` is
/// the reference the store reads on update, `health_center` is the embedded
/// object it returns for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    #[serde(rename = "idUsuario")]
    pub id: VolunteerId,
    #[serde(rename = "nombresCompletos", default, deserialize_with = "string_or_null")]
    pub full_name: String,
    #[serde(rename = "dni", default, deserialize_with = "string_or_null")]
    pub national_id: String,
    #[serde(rename = "direccion", default, deserialize_with = "string_or_null")]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub email: String,
    #[serde(rename = "cumpleanos", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(
        rename = "departamento",
        default,
        deserialize_with = "Department::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<Department>,
    #[serde(rename = "idCentroSalud", default, skip_serializing_if = "Option::is_none")]
    pub health_center_id: Option<HealthCenterId>,
    #[serde(rename = "CentroSalud", default, skip_serializing_if = "Option::is_none")]
    pub health_center: Option<HealthCenterRef>,
    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<Credential>,
}

impl VolunteerRecord {
    pub fn is_volunteer(&self) -> bool {
        self.role.is_some_and(|role| role.is_volunteer())
    }

    /// The committed center reference, falling back to the embedded center.
    pub fn assigned_health_center(&self) -> Option<HealthCenterId> {
        self.health_center_id
            .or_else(|| self.health_center.as_ref().map(|center| center.id))
    }
}

/// Partial user record sent on update. Absent fields are left untouched by
/// both the store and the local merge; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolunteerPatch {
    #[serde(rename = "idUsuario")]
    pub id: VolunteerId,
    #[serde(rename = "nombresCompletos", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "dni", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "cumpleanos", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Option<String>>,
    #[serde(rename = "departamento", skip_serializing_if = "Option::is_none")]
    pub department: Option<Option<Department>>,
    #[serde(rename = "idCentroSalud", skip_serializing_if = "Option::is_none")]
    pub health_center_id: Option<Option<HealthCenterId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Credential>,
}

impl VolunteerPatch {
    pub fn new(id: VolunteerId) -> Self {
        Self {
            id,
            full_name: None,
            national_id: None,
            address: None,
            email: None,
            birth_date: None,
            department: None,
            health_center_id: None,
            password: None,
        }
    }

    /// Field-level merge into `record`. Only fields present on the patch are
    /// written; the id is never touched.
    pub fn apply_to(&self, record: &mut VolunteerRecord) {
        if let Some(full_name) = &self.full_name {
            record.full_name = full_name.clone();
        }
        if let Some(national_id) = &self.national_id {
            record.national_id = national_id.clone();
        }
        if let Some(address) = &self.address {
            record.address = address.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(birth_date) = &self.birth_date {
            record.birth_date = birth_date.clone().filter(|date| !date.is_empty());
        }
        if let Some(department) = &self.department {
            record.department = department.clone();
        }
        if let Some(health_center_id) = self.health_center_id {
            record.health_center_id = health_center_id;
            // the embedded center only describes the reference it came with
            if record.health_center.as_ref().map(|center| center.id) != health_center_id {
                record.health_center = None;
            }
        }
        if let Some(password) = &self.password {
            record.password = Some(password.clone());
        }
    }
}

/// Acknowledgement returned by update and delete calls. Update responses
/// also echo record fields, which are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAck {
    pub success: bool,
    #[serde(rename = "msg", default, deserialize_with = "string_or_null")]
    pub message: String,
}

impl StoreAck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
