//! Role-based access rules.
//!
//! Every role check in the crate goes through [`authorize`].

use thiserror::Error;

use super::token::Identity;
use crate::db::Role;

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateListing,
    ReadListings,
    ReadListing,
    ReadOwnProfile,
}

/// Access denials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The operation needs an authenticated caller.
    #[error("No token, authorization denied")]
    NotAuthenticated,

    /// The caller's role may not perform the operation.
    #[error("{0}")]
    Forbidden(&'static str),
}

/// Decide whether `actor` may perform `operation`.
pub fn authorize(operation: Operation, actor: Option<&Identity>) -> Result<(), PolicyError> {
    match operation {
        Operation::ReadListings | Operation::ReadListing => Ok(()),
        Operation::ReadOwnProfile => actor.map(|_| ()).ok_or(PolicyError::NotAuthenticated),
        Operation::CreateListing => {
            let actor = actor.ok_or(PolicyError::NotAuthenticated)?;
            if actor.role == Role::Landlord {
                Ok(())
            } else {
                Err(PolicyError::Forbidden("Only landlords can create properties"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: "user-1".to_string(),
            role,
        }
    }

    #[test]
    fn test_only_landlords_create_listings() {
        assert!(authorize(Operation::CreateListing, Some(&identity(Role::Landlord))).is_ok());

        for role in [Role::Tenant, Role::Broker, Role::Admin] {
            assert_eq!(
                authorize(Operation::CreateListing, Some(&identity(role))),
                Err(PolicyError::Forbidden("Only landlords can create properties"))
            );
        }
    }

    #[test]
    fn test_create_requires_actor() {
        assert_eq!(
            authorize(Operation::CreateListing, None),
            Err(PolicyError::NotAuthenticated)
        );
    }

    #[test]
    fn test_reads_are_public() {
        assert!(authorize(Operation::ReadListings, None).is_ok());
        assert!(authorize(Operation::ReadListing, None).is_ok());
        for role in Role::ALL {
            assert!(authorize(Operation::ReadListings, Some(&identity(role))).is_ok());
        }
    }

    #[test]
    fn test_own_profile_requires_actor() {
        assert!(authorize(Operation::ReadOwnProfile, Some(&identity(Role::Tenant))).is_ok());
        assert_eq!(
            authorize(Operation::ReadOwnProfile, None),
            Err(PolicyError::NotAuthenticated)
        );
    }
}
