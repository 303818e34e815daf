pub mod reservation;

pub use reservation::{
    CreateReservation, NewReservation, Reservation, ReservationView, UpdateReservation,
};
