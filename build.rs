use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GIT_HASH");

    let build_date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);

    if let Ok(hash) = env::var("GIT_HASH") {
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    } else {
        println!("cargo:rustc-env=GIT_HASH=unknown");
    }
}
