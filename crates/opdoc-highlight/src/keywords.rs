use crate::Language;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "finally", "for", "from", "function",
    "get", "if", "import", "in", "instanceof", "let", "new", "of", "return", "set", "static",
    "switch", "throw", "try", "typeof", "var", "void", "while", "with", "yield",
];

const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "abstract", "declare", "enum", "implements", "infer", "interface", "is", "keyof",
    "namespace", "private", "protected", "public", "readonly", "satisfies", "type",
];

const LITERALS: &[&str] = &["true", "false", "null", "undefined", "NaN", "Infinity"];

const LANGUAGE_VARIABLES: &[&str] = &["this", "super", "arguments"];

const BUILT_INS: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "JSON", "Map", "Math", "Number", "Object", "Promise",
    "RegExp", "Set", "String", "Symbol", "clearInterval", "clearTimeout", "console", "document",
    "parseFloat", "parseInt", "setInterval", "setTimeout", "window",
];

const TYPESCRIPT_BUILT_INS: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "unknown",
];

pub(crate) fn is_keyword(word: &str, language: Language) -> bool {
    KEYWORDS.contains(&word)
        || (language == Language::TypeScript && TYPESCRIPT_KEYWORDS.contains(&word))
}

pub(crate) fn is_literal(word: &str) -> bool {
    LITERALS.contains(&word)
}

pub(crate) fn is_language_variable(word: &str) -> bool {
    LANGUAGE_VARIABLES.contains(&word)
}

pub(crate) fn is_built_in(word: &str, language: Language) -> bool {
    BUILT_INS.contains(&word)
        || (language == Language::TypeScript && TYPESCRIPT_BUILT_INS.contains(&word))
}
