use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_root = PathBuf::from("../proto");

    // Tell cargo to recompile if any proto files change
    println!("cargo:rerun-if-changed=../proto/booking/auth/v1/");

    // Compile auth service protos (client-side)
    tonic_build::configure()
        .build_server(false) // No server code in service-core
        .build_client(true) // Build clients for calling auth-service
        .compile_protos(&["../proto/booking/auth/v1/auth.proto"], &[&proto_root])?;

    Ok(())
}
