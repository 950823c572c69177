//! Unified error codes for the PVZ service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Pickup point errors
//! - 4xxx: Reception errors
//! - 5xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire so clients can
/// branch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// A user with this email is already registered
    UserAlreadyExists = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// Email is malformed
    InvalidEmail = 1007,
    /// Role is not one of the known roles
    InvalidRole = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Pickup point ====================
    /// Pickup point not found
    PickupPointNotFound = 3001,
    /// City is not served
    InvalidCity = 3002,

    // ==================== 4xxx: Reception ====================
    /// The pickup point already has a reception in progress
    ReceptionAlreadyOpen = 4001,
    /// The pickup point has no reception in progress
    NoActiveReception = 4002,
    /// Product removal attempted without a reception in progress
    ReceptionNotOpen = 4003,

    // ==================== 5xxx: Product ====================
    /// The open reception has no products to remove
    NoProductsToDelete = 5001,
    /// Product type is not one of the accepted types
    InvalidProductType = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::UserAlreadyExists => "User already exists",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::InvalidEmail => "Invalid email",
            ErrorCode::InvalidRole => "Role must be employee or moderator",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Pickup point
            ErrorCode::PickupPointNotFound => "Pickup point not found",
            ErrorCode::InvalidCity => "City must be Moscow, Saint Petersburg or Kazan",

            // Reception
            ErrorCode::ReceptionAlreadyOpen => "Pickup point's last reception is still in progress",
            ErrorCode::NoActiveReception => "No active reception found",
            ErrorCode::ReceptionNotOpen => "No active reception",

            // Product
            ErrorCode::NoProductsToDelete => "No products to delete",
            ErrorCode::InvalidProductType => "Type must be electronics, clothes or shoes",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::UserAlreadyExists),
            1006 => Ok(ErrorCode::PasswordTooShort),
            1007 => Ok(ErrorCode::InvalidEmail),
            1008 => Ok(ErrorCode::InvalidRole),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Pickup point
            3001 => Ok(ErrorCode::PickupPointNotFound),
            3002 => Ok(ErrorCode::InvalidCity),

            // Reception
            4001 => Ok(ErrorCode::ReceptionAlreadyOpen),
            4002 => Ok(ErrorCode::NoActiveReception),
            4003 => Ok(ErrorCode::ReceptionNotOpen),

            // Product
            5001 => Ok(ErrorCode::NoProductsToDelete),
            5002 => Ok(ErrorCode::InvalidProductType),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
