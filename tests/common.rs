#![allow(dead_code)]

use std::sync::OnceLock;

use abitypes::abi::LayoutTable;
use abitypes::loader;

/// The built-in armv7 table, loaded once and shared by every test in the binary.
pub fn armv7() -> &'static LayoutTable {
    static TABLE: OnceLock<LayoutTable> = OnceLock::new();
    TABLE.get_or_init(|| loader::builtin("armv7-none-eabi").expect("armv7 table loads"))
}

pub fn x86_64() -> &'static LayoutTable {
    static TABLE: OnceLock<LayoutTable> = OnceLock::new();
    TABLE.get_or_init(|| loader::builtin("x86_64-linux-musl").expect("x86_64 table loads"))
}

/// Names of everything a registry emitted, in emission order.
pub fn emitted_names(definitions: &[abitypes::Definition]) -> Vec<&str> {
    definitions.iter().map(|definition| definition.name.as_str()).collect()
}
