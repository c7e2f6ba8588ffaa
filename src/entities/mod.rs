pub mod categories;
pub mod favorites;
pub mod guides;
pub mod log_entries;
pub mod user_activities;
pub mod user_roles;
pub mod users;

pub use categories as category_entity;
pub use favorites as favorite_entity;
pub use guides as guide_entity;
pub use log_entries as log_entry_entity;
pub use user_activities as user_activity_entity;
pub use user_roles as user_role_entity;
pub use users as user_entity;
