pub mod assignment;
pub mod date_range;
pub mod grouping;
pub mod progress;
pub mod selection;
pub mod shipment;
pub mod stage;
pub mod status;
pub mod transition;

pub use assignment::AssignmentForm;
pub use date_range::DateRange;
pub use shipment::{
    CancelRequest, Customer, Driver, EditDriverTnkbRequest, HandoverRequest, ShipmentDocument,
    Tnkb, UpdateDriverRequest,
};
pub use stage::{Stage, StageView};
pub use status::ShipmentStatus;
pub use transition::{Action, Endpoint, TransitionError};
