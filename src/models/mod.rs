pub mod itinerary;
pub mod regeneration;
