//! Role Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;
pub mod assignment;
pub mod expand;

pub use events::{RoleCreated, RoleDeleted, RoleExpanded, RoleMemberAdded, RoleMemberRemoved, RoleUpdated};

pub use create::{CreateRoleCommand, CreateRoleUseCase};
pub use update::{UpdateRoleCommand, UpdateRoleUseCase};
pub use delete::{DeleteRoleCommand, DeleteRoleUseCase};
pub use assignment::{
    AddRoleMemberCommand, AddRoleMemberUseCase, AssignmentRepos, RemoveRoleMemberCommand,
    RemoveRoleMemberUseCase,
};
pub use expand::{CollapseRoleCommand, CollapseRoleUseCase, ExpandRoleCommand, ExpandRoleUseCase};
