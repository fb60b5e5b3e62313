//! The standard request vocabulary every complete target table must cover.

use super::dialect::DialectScope;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Word {
    pub name: &'static str,
    pub scope: DialectScope,
}

const fn any(name: &'static str) -> Word {
    Word {
        name,
        scope: DialectScope::Any,
    }
}

pub const STANDARD: &[Word] = &[
    any("va_list"),
    any("__isoc_va_list"),
    // wchar_t is a keyword in C++
    Word {
        name: "wchar_t",
        scope: DialectScope::C,
    },
    any("float_t"),
    any("double_t"),
    any("max_align_t"),
    any("time_t"),
    any("suseconds_t"),
    any("pthread_attr_t"),
    any("pthread_mutex_t"),
    any("mtx_t"),
    any("pthread_cond_t"),
    any("cnd_t"),
    any("pthread_rwlock_t"),
    any("pthread_barrier_t"),
    any("size_t"),
    any("uintptr_t"),
    any("ptrdiff_t"),
    any("ssize_t"),
    any("intptr_t"),
    any("regoff_t"),
    any("register_t"),
    any("int8_t"),
    any("int16_t"),
    any("int32_t"),
    any("int64_t"),
    any("intmax_t"),
    any("uint8_t"),
    any("uint16_t"),
    any("uint32_t"),
    any("uint64_t"),
    any("u_int64_t"),
    any("uintmax_t"),
    any("mode_t"),
    any("nlink_t"),
    any("off_t"),
    any("ino_t"),
    any("dev_t"),
    any("blksize_t"),
    any("blkcnt_t"),
    any("fsblkcnt_t"),
    any("fsfilcnt_t"),
    any("wint_t"),
    any("wctype_t"),
    any("timer_t"),
    any("clockid_t"),
    any("clock_t"),
    any("struct_timeval"),
    any("struct_timespec"),
    any("pid_t"),
    any("id_t"),
    any("uid_t"),
    any("gid_t"),
    any("key_t"),
    any("useconds_t"),
    any("pthread_t"),
    any("pthread_once_t"),
    any("pthread_key_t"),
    any("pthread_spinlock_t"),
    any("pthread_mutexattr_t"),
    any("pthread_condattr_t"),
    any("pthread_barrierattr_t"),
    any("pthread_rwlockattr_t"),
    any("FILE"),
    any("mbstate_t"),
    any("locale_t"),
    any("sigset_t"),
    any("struct_iovec"),
    any("socklen_t"),
    any("sa_family_t"),
];
