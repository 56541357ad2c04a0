// flipbook-data: Serde structs for the packed sprite-sheet manifest format
pub mod model;
