mod common;

use abitypes::emit::render_header;
use abitypes::loader::{self, LoadError};
use pretty_assertions::assert_eq;

use common::{armv7, x86_64};

/// The block a rendered header carries for `name`, up to and including its `#endif`.
fn block<'h>(header: &'h str, name: &str) -> &'h str {
    let start = header
        .find(&format!("#if defined(__NEED_{name})"))
        .unwrap_or_else(|| panic!("no block for {name}"));
    let len = header[start..].find("#endif\n").expect("block is closed") + "#endif\n".len();
    &header[start..start + len]
}

#[test]
fn armv7_blocks_match_musl_layout() {
    let header = render_header(armv7());
    assert_eq!(
        block(&header, "pthread_mutex_t"),
        "#if defined(__NEED_pthread_mutex_t) && !defined(__DEFINED_pthread_mutex_t) \
         && !defined(__CLANG_PTHREAD_MUTEX_T_DEFINED)\n\
         typedef struct { union { int __i[6]; volatile int __vi[6]; \
         volatile void *volatile __p[6]; } __u; } pthread_mutex_t;\n\
         #define __DEFINED_pthread_mutex_t\n\
         #define __CLANG_PTHREAD_MUTEX_T_DEFINED\n\
         #endif\n"
    );
    assert_eq!(
        block(&header, "struct_iovec"),
        "#if defined(__NEED_struct_iovec) && !defined(__DEFINED_struct_iovec)\n\
         struct iovec { void *iov_base; size_t iov_len; };\n\
         #define __DEFINED_struct_iovec\n\
         #endif\n"
    );
    assert_eq!(
        block(&header, "uint64_t"),
        "#if defined(__NEED_uint64_t) && !defined(__DEFINED_uint64_t) \
         && !defined(__CLANG_UINT64_T_DEFINED)\n\
         typedef unsigned _Int64 uint64_t;\n\
         #define __DEFINED_uint64_t\n\
         #define __CLANG_UINT64_T_DEFINED\n\
         #endif\n"
    );
}

#[test]
fn armv7_spellings_match_the_musl_source() {
    // a bare `unsigned` and a `sizeof(long)` bound are written as they were given
    let header = render_header(armv7());
    assert!(block(&header, "wchar_t").contains("\ntypedef unsigned wchar_t;\n"));
    assert!(
        block(&header, "sigset_t")
            .contains("typedef struct __sigset_t { unsigned long __bits[128/sizeof(long)]; } sigset_t;")
    );
    assert!(block(&header, "uint32_t").contains("\ntypedef unsigned int uint32_t;\n"));
}

#[test]
fn wchar_t_is_hidden_from_cxx() {
    let header = render_header(x86_64());
    let at = header.find("#if defined(__NEED_wchar_t)").expect("wchar_t block");
    assert!(header[..at].ends_with("#ifndef __cplusplus\n"));
    assert!(block(&header, "wchar_t").contains("typedef int wchar_t;"));
}

#[test]
fn every_table_name_gets_a_block() {
    for table in [armv7(), x86_64()] {
        let header = render_header(table);
        for name in table.names() {
            let need = format!("#if defined(__NEED_{name})");
            let blocks = header.matches(&need).count();
            let expected = if name.as_str() == "pthread_t" { 2 } else { 1 };
            assert_eq!(blocks, expected, "{name} on {}", table.target().name);
        }
        assert!(header.starts_with("#define _Addr "));
        assert!(header.ends_with("#undef _Reg\n"));
    }
}

#[test]
fn header_macros_follow_the_target() {
    let header = render_header(x86_64());
    assert!(header.starts_with("#define _Addr long\n#define _Int64 long\n#define _Reg long\n"));
}

#[test]
fn missing_defs_file_is_an_io_error() {
    let err = loader::load_path("defs/does-not-exist.toml").expect_err("no such file");
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}
