use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=EPD_VENDOR_LIB_DIR");
    println!("cargo:rerun-if-env-changed=EPD_VENDOR_LIB");
    println!("cargo:rerun-if-env-changed=EPD_VENDOR_DEPS");

    if env::var_os("CARGO_FEATURE_VENDOR").is_none() {
        return;
    }

    // The vendor sources (EPD_7in3e.c, DEV_Config.c and friends) are built out of tree.
    if let Ok(dir) = env::var("EPD_VENDOR_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    let lib = env::var("EPD_VENDOR_LIB").unwrap_or_else(|_| "epd7in3e".to_string());
    println!("cargo:rustc-link-lib={lib}");

    // DEV_Config is compiled against one GPIO backend (lgpio, bcm2835, wiringPi...).
    if let Ok(deps) = env::var("EPD_VENDOR_DEPS") {
        for dep in deps.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            println!("cargo:rustc-link-lib={dep}");
        }
    }
}
