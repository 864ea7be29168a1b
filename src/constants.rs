/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_BACKEND_URL: &str =
    "https://kaveri30-ai-driven-archeological-site-mapping-backend.hf.space";
pub const VEGETATION_ENDPOINT: &str = "/analyze-vegetation/";
pub const SOIL_ENDPOINT: &str = "/detect-soil/";
pub const UPLOAD_FIELD_NAME: &str = "file";

// Timing
pub const MESSAGE_TIMEOUT_SECS: u64 = 5;
pub const LOGIN_DELAY_MS: u64 = 1000;
pub const MOCK_LATENCY_MS: u64 = 800;

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const PREVIEW_DATA_URL_CHARS: usize = 48;

// Validation
pub const MIN_PASSWORD_LEN: usize = 6;

// User-facing messages
pub const MSG_LOGIN_MISSING_FIELDS: &str = "Please enter both username and password.";
pub const MSG_LOGGING_IN: &str = "Logging in...";
pub const MSG_CREATE_MISSING_FIELDS: &str = "Please fill in all fields.";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
pub const MSG_ACCOUNT_CREATED: &str = "Account created successfully! Please log in.";
pub const MSG_PROCESSING: &str = "Processing image...";
pub const MSG_ANALYSIS_COMPLETE: &str = "Analysis complete!";
pub const MSG_NO_FILE_SELECTED: &str = "Please select an image first.";
pub const MSG_EMPTY_FILE: &str = "The selected file is empty.";
pub const MSG_BUSY: &str = "An analysis is already in progress.";
pub const MSG_BACKEND_ERROR: &str = "Backend error";

// Result panel placeholders
pub const RESULT_IDLE: &str = "Select an image to begin analysis.";
pub const RESULT_LOADING: &str = "Processing image...";
pub const RESULT_FAILED: &str = "Error processing image.";

// Mock backend
pub const MOCK_MESSAGE: &str = "Mock analysis (no backend contacted).";
pub const MOCK_SOIL_TYPES: &[&str] = &[
    "Alluvial",
    "Black",
    "Red",
    "Laterite",
    "Desert",
    "Mountain",
];
