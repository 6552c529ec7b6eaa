pub mod itinerary;
pub mod request;
