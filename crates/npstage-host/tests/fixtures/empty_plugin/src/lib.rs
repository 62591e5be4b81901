//! A shared object that is not a plugin: exports none of the mandatory
//! entry points. Loading it must fail the session handshake.

#[unsafe(no_mangle)]
pub extern "C" fn not_a_plugin_entry() -> i32 {
    42
}
