//! Capability table
//!
//! Every protected route maps to one [`Operation`]; every operation lists
//! the roles allowed to perform it. The gate middleware consults nothing
//! else.

use http::Method;
use shared::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreatePickupPoint,
    ListPickupPoints,
    OpenReception,
    CloseReception,
    AddProduct,
    RemoveLastProduct,
}

const MODERATOR_ONLY: &[Role] = &[Role::Moderator];
const EMPLOYEE_ONLY: &[Role] = &[Role::Employee];
const ANY_ROLE: &[Role] = &[Role::Employee, Role::Moderator];

/// Operation -> allowed roles
pub const CAPABILITIES: &[(Operation, &[Role])] = &[
    (Operation::CreatePickupPoint, MODERATOR_ONLY),
    (Operation::ListPickupPoints, ANY_ROLE),
    (Operation::OpenReception, EMPLOYEE_ONLY),
    (Operation::CloseReception, EMPLOYEE_ONLY),
    (Operation::AddProduct, EMPLOYEE_ONLY),
    (Operation::RemoveLastProduct, EMPLOYEE_ONLY),
];

/// (method, route template) -> operation
const ROUTES: &[(Method, &str, Operation)] = &[
    (Method::POST, "/pvz", Operation::CreatePickupPoint),
    (Method::GET, "/pvz", Operation::ListPickupPoints),
    (Method::POST, "/receptions", Operation::OpenReception),
    (
        Method::POST,
        "/pvz/{pvzId}/close_last_reception",
        Operation::CloseReception,
    ),
    (Method::POST, "/products", Operation::AddProduct),
    (
        Method::POST,
        "/pvz/{pvzId}/delete_last_product",
        Operation::RemoveLastProduct,
    ),
];

impl Operation {
    /// Resolve a matched route template
    pub fn for_route(method: &Method, template: &str) -> Option<Operation> {
        ROUTES
            .iter()
            .find(|(m, t, _)| m == method && *t == template)
            .map(|(_, _, op)| *op)
    }

    pub fn allowed_roles(self) -> &'static [Role] {
        CAPABILITIES
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }

    pub fn is_allowed(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_matrix() {
        use Operation::*;
        let expected = [
            (CreatePickupPoint, false, true),
            (ListPickupPoints, true, true),
            (OpenReception, true, false),
            (CloseReception, true, false),
            (AddProduct, true, false),
            (RemoveLastProduct, true, false),
        ];
        for (op, employee, moderator) in expected {
            assert_eq!(op.is_allowed(Role::Employee), employee, "{op:?} employee");
            assert_eq!(op.is_allowed(Role::Moderator), moderator, "{op:?} moderator");
        }
    }

    #[test]
    fn test_every_route_operation_has_capabilities() {
        for (_, _, op) in ROUTES {
            assert!(!op.allowed_roles().is_empty(), "{op:?} has no roles");
        }
    }

    #[test]
    fn test_for_route() {
        assert_eq!(
            Operation::for_route(&Method::GET, "/pvz"),
            Some(Operation::ListPickupPoints)
        );
        assert_eq!(
            Operation::for_route(&Method::POST, "/pvz/{pvzId}/delete_last_product"),
            Some(Operation::RemoveLastProduct)
        );
        assert_eq!(Operation::for_route(&Method::DELETE, "/pvz"), None);
        assert_eq!(Operation::for_route(&Method::GET, "/unknown"), None);
    }
}
