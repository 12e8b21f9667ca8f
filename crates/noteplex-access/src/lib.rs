//! # noteplex-access
//!
//! Hierarchical access control for notes.
//!
//! This crate owns the authorization subsystem: effective-team
//! resolution up the parent chain, invitation redemption, the policy
//! evaluator that protected routes run through, and team role
//! mutations. It operates exclusively through the repository traits in
//! `noteplex-core`, so the same services run against PostgreSQL in
//! production and the in-memory mocks in tests.

pub mod invitations;
pub mod mocks;
pub mod policy;
pub mod resolver;
pub mod roles;

pub use invitations::InvitationService;
pub use policy::{DenyStatus, Policy, PolicyDecision, PolicyEvaluator, RequestContext, UploadIntent};
pub use resolver::TeamResolver;
pub use roles::RoleService;
