pub use super::emergency_contact::Entity as EmergencyContact;
pub use super::enums::{
    HelpStatus, OperationStatus, Priority, ServiceType, SupplyCategory, SupplyStatus,
    VolunteerStatus,
};
pub use super::help_request::Entity as HelpRequest;
pub use super::relief_supply::Entity as ReliefSupply;
pub use super::rescue_operation::Entity as RescueOperation;
pub use super::volunteer::Entity as Volunteer;
