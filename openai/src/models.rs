//! Model constants for the completion endpoint.

/// gpt-3.5-turbo-instruct, the current completion-endpoint model.
pub const MODEL_GPT_35_TURBO_INSTRUCT: &str = "gpt-3.5-turbo-instruct";

/// text-davinci-003, the legacy GPT-3 completion model.
pub const MODEL_TEXT_DAVINCI_003: &str = "text-davinci-003";

/// davinci-002, the base GPT-3 replacement model.
pub const MODEL_DAVINCI_002: &str = "davinci-002";

/// Model used when none is configured.
pub const DEFAULT_COMPLETION_MODEL: &str = MODEL_GPT_35_TURBO_INSTRUCT;
