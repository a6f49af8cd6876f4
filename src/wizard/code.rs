//! Payroll code derivation.
//!
//! A default payroll code is derived from the provider and plan names until
//! the operator types a code or accepts a generated one.

/// Maximum length of a payroll code.
pub const MAX_CODE_LENGTH: usize = 12;

/// Characters kept from each name when deriving a code.
const TOKEN_LENGTH: usize = 4;

/// Reduces a name to its derivation token: the first whitespace-delimited
/// word, ASCII alphanumerics only, at most four characters, upper-cased.
pub(crate) fn code_token(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(TOKEN_LENGTH)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Derives the default payroll code from a provider name and a plan name.
///
/// The two tokens are joined with a hyphen. When only one side produces a
/// token it is used alone; when neither does the code is empty.
///
/// # Examples
///
/// ```
/// use deduction_registry::wizard::derive_code;
///
/// assert_eq!(derive_code("BlueCross BlueShield", "Basic PPO"), "BLUE-BASI");
/// assert_eq!(derive_code("", "Vision Gold"), "VISI");
/// assert_eq!(derive_code("", ""), "");
/// ```
pub fn derive_code(provider_name: &str, plan_name: &str) -> String {
    let provider = code_token(provider_name);
    let plan = code_token(plan_name);

    match (provider.is_empty(), plan.is_empty()) {
        (true, true) => String::new(),
        (true, false) => plan,
        (false, true) => provider,
        (false, false) => format!("{}-{}", provider, plan),
    }
}

/// Normalizes a typed or suggested code: upper-cased and cut to
/// [`MAX_CODE_LENGTH`] characters.
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .to_uppercase()
        .chars()
        .take(MAX_CODE_LENGTH)
        .collect()
}
