//! gRPC surface of auth-service.

pub mod auth_service;

pub mod proto {
    pub mod auth {
        tonic::include_proto!("booking.auth.v1");

        // File descriptor set for gRPC reflection
        pub const FILE_DESCRIPTOR_SET: &[u8] =
            tonic::include_file_descriptor_set!("auth_service_descriptor");
    }
}

pub use auth_service::AuthServiceImpl;
