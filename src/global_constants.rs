pub const APPLICATION_NAME: &str = "med-label-reader";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const DEFAULT_BINARIZATION_THRESHOLD: u8 = 128;
pub const BINARIZED_LIGHT_VALUE: u8 = 255;
pub const BINARIZED_DARK_VALUE: u8 = 0;

pub const DEFAULT_OCR_LANGUAGES: &str = "eng+kor";
pub const DEFAULT_MAX_LOOKUP_LINE_LENGTH: usize = 40;
pub const DEFAULT_MAX_CONCURRENT_EXTRACTIONS: usize = 4;
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;
pub const DEFAULT_LOCAL_OCR_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_REMOTE_OCR_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_COLLABORATOR_TIMEOUT_SECONDS: u64 = 60;

pub const NO_TEXT_DETECTED: &str = "no text detected";
pub const EXTRACTION_CANCELLED: &str = "cancelled";

pub const CLOUD_VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const CLOUD_VISION_FEATURE_TYPE: &str = "TEXT_DETECTION";

pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = "Based on the medication label text below, explain \
what to watch out for when taking these medications together, and point out any combinations \
that should not be taken together.";

pub const DRUG_REGISTRY_API_URL: &str =
    "http://apis.data.go.kr/1471000/DrbEasyDrugInfoService/getDrbEasyDrugList";

pub const ENV_VISION_API_KEY: &str = "MED_LABEL_VISION_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "MED_LABEL_OPENAI_API_KEY";
pub const ENV_REGISTRY_API_KEY: &str = "MED_LABEL_REGISTRY_API_KEY";
