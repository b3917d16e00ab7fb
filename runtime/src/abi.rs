/*!
Linkage Contract - the symbols compiled programs call

A back end emits `llvm_declarations()` at the top of every module it
generates and links the result against `liblatte_runtime.a`.
*/

/// One exported runtime function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Linker symbol
    pub symbol: &'static str,
    /// Operation the symbol implements
    pub operation: &'static str,
    pub c_return: &'static str,
    pub c_params: &'static [&'static str],
    pub llvm_return: &'static str,
    pub llvm_params: &'static [&'static str],
    /// Buffer returned to the caller, released with `free`
    pub returns_owned: bool,
    pub noreturn: bool,
}

pub const ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint {
        symbol: "concat",
        operation: "concatenate",
        c_return: "char *",
        c_params: &["const char *s1", "const char *s2"],
        llvm_return: "ptr",
        llvm_params: &["ptr", "ptr"],
        returns_owned: true,
        noreturn: false,
    },
    EntryPoint {
        symbol: "printString",
        operation: "print string",
        c_return: "void",
        c_params: &["const char *s"],
        llvm_return: "void",
        llvm_params: &["ptr"],
        returns_owned: false,
        noreturn: false,
    },
    EntryPoint {
        symbol: "printInt",
        operation: "print integer",
        c_return: "void",
        c_params: &["int x"],
        llvm_return: "void",
        llvm_params: &["i32"],
        returns_owned: false,
        noreturn: false,
    },
    EntryPoint {
        symbol: "readInt",
        operation: "read integer",
        c_return: "int",
        c_params: &[],
        llvm_return: "i32",
        llvm_params: &[],
        returns_owned: false,
        noreturn: false,
    },
    EntryPoint {
        symbol: "readString",
        operation: "read line",
        c_return: "char *",
        c_params: &[],
        llvm_return: "ptr",
        llvm_params: &[],
        returns_owned: true,
        noreturn: false,
    },
    EntryPoint {
        symbol: "error",
        operation: "fail",
        c_return: "void",
        c_params: &[],
        llvm_return: "void",
        llvm_params: &[],
        returns_owned: false,
        noreturn: true,
    },
];

impl EntryPoint {
    /// `declare` line for LLVM IR
    pub fn llvm_declaration(&self) -> String {
        let mut decl = format!(
            "declare {} @{}({})",
            self.llvm_return,
            self.symbol,
            self.llvm_params.join(", ")
        );
        if self.noreturn {
            decl.push_str(" noreturn");
        }
        decl
    }

    /// Prototype for a C header
    pub fn c_prototype(&self) -> String {
        let params = if self.c_params.is_empty() {
            "void".to_string()
        } else {
            self.c_params.join(", ")
        };
        let attrs = if self.noreturn {
            " __attribute__((noreturn))"
        } else {
            ""
        };
        let space = if self.c_return.ends_with('*') { "" } else { " " };
        format!("{}{}{}({}){};", self.c_return, space, self.symbol, params, attrs)
    }
}

/// Look up an entry point by linker symbol
pub fn lookup(symbol: &str) -> Option<&'static EntryPoint> {
    ENTRY_POINTS.iter().find(|entry| entry.symbol == symbol)
}

/// All `declare` lines, one per entry point, in table order
pub fn llvm_declarations() -> String {
    ENTRY_POINTS
        .iter()
        .map(|entry| entry.llvm_declaration() + "\n")
        .collect()
}

/// A self-contained C header declaring every entry point
pub fn c_header() -> String {
    let mut header = String::from(
        "#ifndef LATTE_RUNTIME_H\n\
         #define LATTE_RUNTIME_H\n\
         \n\
         /* Strings returned by concat and readString are malloc'ed and owned\n\
         \x20* by the caller; release them with free(). */\n\
         \n",
    );
    for entry in ENTRY_POINTS {
        header.push_str(&entry.c_prototype());
        header.push('\n');
    }
    header.push_str("\n#endif /* LATTE_RUNTIME_H */\n");
    header
}
