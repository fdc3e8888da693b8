//! Ownership policy for mutations
//!
//! Only the recorded author of a resource may change it. Callers resolve
//! the resource first and report `NotFound` themselves.

use super::middleware::AuthUser;
use quill_shared::AuthError;
use uuid::Uuid;

/// A resource with a recorded author
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

/// Allow the mutation iff `identity` is the author of `resource`
pub fn authorize<R: Authored + ?Sized>(identity: &AuthUser, resource: &R) -> Result<(), AuthError> {
    authorize_id(identity.user_id, resource)
}

/// Same check for callers holding only the user id
pub fn authorize_id<R: Authored + ?Sized>(user_id: Uuid, resource: &R) -> Result<(), AuthError> {
    if resource.author_id() == user_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    struct Doc(Uuid);

    impl Authored for Doc {
        fn author_id(&self) -> Uuid {
            self.0
        }
    }

    const ALICE: Uuid = Uuid::from_u128(1);
    const BOB: Uuid = Uuid::from_u128(2);

    #[rstest]
    #[case(ALICE, ALICE, Ok(()))]
    #[case(BOB, ALICE, Err(AuthError::Forbidden))]
    #[case(Uuid::nil(), ALICE, Err(AuthError::Forbidden))]
    fn test_authorize_id(
        #[case] caller: Uuid,
        #[case] author: Uuid,
        #[case] expected: Result<(), AuthError>,
    ) {
        assert_eq!(authorize_id(caller, &Doc(author)), expected);
    }

    proptest! {
        #[test]
        fn prop_allow_iff_same_author(caller in any::<u128>(), author in any::<u128>()) {
            let result = authorize_id(Uuid::from_u128(caller), &Doc(Uuid::from_u128(author)));
            if caller == author {
                prop_assert_eq!(result, Ok(()));
            } else {
                prop_assert_eq!(result, Err(AuthError::Forbidden));
            }
        }

        #[test]
        fn prop_author_always_allowed(author in any::<u128>()) {
            let id = Uuid::from_u128(author);
            prop_assert!(authorize_id(id, &Doc(id)).is_ok());
        }
    }
}
