use twilight_model::id::{
    Id,
    marker::{RoleMarker, UserMarker},
};

/// Check whether an actor's role set contains the required staff role.
///
/// This is the single gate in front of every privileged verb; deny must
/// short-circuit the caller before any enforcement call or ledger write.
pub fn has_staff_role(actor_roles: &[Id<RoleMarker>], staff_role_id: Id<RoleMarker>) -> bool {
    actor_roles.contains(&staff_role_id)
}

/// Check whether an actor is the configured owner identity.
///
/// Evaluated by identity equality only, independent of the role gate.
pub fn is_owner(actor_id: Id<UserMarker>, owner_id: Id<UserMarker>) -> bool {
    actor_id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_gate_requires_exact_role_membership() {
        let staff = Id::new(10);
        assert!(has_staff_role(&[Id::new(3), staff, Id::new(7)], staff));
        assert!(!has_staff_role(&[Id::new(3), Id::new(7)], staff));
        assert!(!has_staff_role(&[], staff));
    }

    #[test]
    fn owner_gate_is_identity_equality() {
        let owner = Id::new(42);
        assert!(is_owner(owner, owner));
        assert!(!is_owner(Id::new(43), owner));
    }
}
