use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = PathBuf::from("../proto");

    println!("cargo:rerun-if-changed=../proto/booking/auth/v1/");

    // Clients are built in service-core
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .file_descriptor_set_path(
            PathBuf::from(std::env::var("OUT_DIR")?).join("auth_service_descriptor.bin"),
        )
        .compile_protos(&["../proto/booking/auth/v1/auth.proto"], &[proto_root])?;

    Ok(())
}
