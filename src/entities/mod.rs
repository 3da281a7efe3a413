pub mod emergency_contact;
pub mod enums;
pub mod help_request;
pub mod relief_supply;
pub mod rescue_operation;
pub mod volunteer;

pub use emergency_contact::Entity as EmergencyContact;
pub use help_request::Entity as HelpRequest;
pub use relief_supply::Entity as ReliefSupply;
pub use rescue_operation::Entity as RescueOperation;
pub use volunteer::Entity as Volunteer;

pub mod prelude;
