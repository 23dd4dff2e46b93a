use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::lenient::i64_from_any;

/// Role operator berdasarkan `title` dari `/me`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Delivery,
    Dpk,
    Driver,
    Marketing,
    Finance,
    Other(String),
}

impl Role {
    // Backend tidak konsisten soal huruf besar ("dpk", "Delivery", "driver")
    pub fn from_title(title: &str) -> Self {
        let normalized = title.trim().to_lowercase();
        match normalized.as_str() {
            "admin" => Role::Admin,
            "delivery" => Role::Delivery,
            "dpk" => Role::Dpk,
            "driver" => Role::Driver,
            "marketing" => Role::Marketing,
            "apik staff accounting" | "fat" | "finance" => Role::Finance,
            _ => Role::Other(title.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Delivery => "Delivery",
            Role::Dpk => "DPK",
            Role::Driver => "Driver",
            Role::Marketing => "Marketing",
            Role::Finance => "FAT",
            Role::Other(title) => title,
        }
    }
}

/// Data user dari `GET /me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    #[serde(deserialize_with = "i64_from_any")]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl CurrentUser {
    pub fn role(&self) -> Role {
        self.title
            .as_deref()
            .map(Role::from_title)
            .unwrap_or_else(|| Role::Other(String::new()))
    }

    /// Cek apakah user adalah driver
    pub fn is_driver(&self) -> bool {
        self.role() == Role::Driver
    }

    /// Cek apakah user adalah admin
    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

/// Token dari `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username wajib diisi"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}
