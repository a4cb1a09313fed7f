//! User records as returned by the users listing endpoint.

use serde::{Deserialize, Serialize};

/// Number of records requested per page
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive parse ("Female", "MALE", ...)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Single-letter abbreviation used in the demography column
    pub fn initial(&self) -> char {
        match self {
            Self::Male => 'm',
            Self::Female => 'f',
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Gender::from_str(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown gender '{}'", raw)))
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub image: String,
    pub address: Address,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age plus gender initial, e.g. "28/m"
    pub fn demography(&self) -> String {
        format!("{}/{}", self.age, self.gender.initial())
    }

    pub fn location(&self) -> String {
        format!(
            "{}, {}, {}",
            self.address.city, self.address.state, self.address.country
        )
    }
}

/// Response body of `GET /users`
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[cfg(test)]
impl UsersPage {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            total: None,
            skip: None,
            limit: None,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_user(id: u64, first_name: &str, age: u32, gender: Gender, country: &str) -> User {
    User {
        id,
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        age,
        gender,
        image: format!("https://dummyjson.com/icon/{}/128", id),
        address: Address {
            city: "Springfield".to_string(),
            state: "Illinois".to_string(),
            country: country.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_user() {
        let json = r#"{
            "id": 1,
            "firstName": "Emily",
            "lastName": "Johnson",
            "maidenName": "Smith",
            "age": 28,
            "gender": "female",
            "image": "https://dummyjson.com/icon/emilys/128",
            "address": {
                "address": "626 Main Street",
                "city": "Phoenix",
                "state": "Mississippi",
                "country": "United States"
            }
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Emily");
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.address.country, "United States");
        assert_eq!(user.demography(), "28/f");
        assert_eq!(user.full_name(), "Emily Johnson");
        assert_eq!(user.location(), "Phoenix, Mississippi, United States");
    }

    #[test]
    fn test_deserialize_page_with_metadata() {
        let json = r#"{"users": [], "total": 208, "skip": 200, "limit": 8}"#;
        let page: UsersPage = serde_json::from_str(json).unwrap();
        assert!(page.users.is_empty());
        assert_eq!(page.total, Some(208));
        assert_eq!(page.limit, Some(8));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::from_str("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_str(" MALE "), Some(Gender::Male));
        assert_eq!(Gender::from_str("other"), None);
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
    }
}
