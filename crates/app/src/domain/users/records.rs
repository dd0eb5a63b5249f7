//! User Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// Role granted to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Seller,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Seller => "SELLER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CUSTOMER" => Ok(Self::Customer),
            "SELLER" => Ok(Self::Seller),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller on whose behalf a service operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user: UserUuid,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub const fn new(user: UserUuid, role: Role) -> Self {
        Self { user, role }
    }

    #[must_use]
    pub const fn is_customer(&self) -> bool {
        matches!(self.role, Role::Customer)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Sellers act on shops they own; admins act on any shop.
    #[must_use]
    pub fn may_manage(&self, owner: UserUuid) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Seller => self.user == owner,
            Role::Customer => false,
        }
    }
}

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl UserRecord {
    #[must_use]
    pub const fn identity(&self) -> Identity {
        Identity::new(self.uuid, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_their_column_value() {
        for role in [Role::Customer, Role::Seller, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role));
        }

        assert!("customer".parse::<Role>().is_err());
    }

    #[test]
    fn only_owner_seller_or_admin_may_manage() {
        let owner = UserUuid::new();

        assert!(Identity::new(owner, Role::Seller).may_manage(owner));
        assert!(!Identity::new(UserUuid::new(), Role::Seller).may_manage(owner));
        assert!(Identity::new(UserUuid::new(), Role::Admin).may_manage(owner));
        assert!(!Identity::new(owner, Role::Customer).may_manage(owner));
    }
}
