/// Types every translation unit can name without a declaration.
pub const BUILTIN_TYPES: &[&str] = &[
    // C types
    "bool",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    // stdint types
    "int8_t",
    "uint8_t",
    "int16_t",
    "uint16_t",
    "int32_t",
    "uint32_t",
    "int64_t",
    "uint64_t",
    "intptr_t",
    "uintptr_t",
    "size_t",
    "ssize_t",
    // Mozilla types
    "nsresult",
    "nsString",
    "nsCString",
    "mozilla::ipc::Shmem",
];
