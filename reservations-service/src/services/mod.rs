pub mod reservations;

pub use reservations::ReservationsService;
