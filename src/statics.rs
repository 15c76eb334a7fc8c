// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Aurora Tabular Modeller";

pub const EN_HEADING_TREE: &str = "Model Structure";
pub const EN_HEADING_DETAIL: &str = "Detail";

pub const EN_DIALOG_OPEN_TITLE: &str = "Open .bim File";
pub const EN_FILTER_BIM: &str = "BIM Files";
pub const EN_FILTER_ALL: &str = "All Files";

pub const EN_WINDOW_FILE_LOADED: &str = "File Loaded";
pub const EN_WINDOW_FILE_SAVED: &str = "File Saved";
pub const EN_WINDOW_ERROR: &str = "Error";
pub const EN_WINDOW_NO_FILE: &str = "No File Selected";
pub const EN_NO_FILE_SELECTED: &str = "Please select a .bim file to proceed.";
pub const EN_SUFFIX_LOADED: &str = "loaded successfully.";
pub const EN_SUFFIX_SAVED: &str = "saved successfully.";
pub const EN_PREFIX_LOAD_FAILED: &str = "Failed to load:";
pub const EN_PREFIX_SAVE_FAILED: &str = "Failed to save file:";
pub const EN_PREFIX_UPDATE_FAILED: &str = "Unable to update the path:";

pub const EN_BTN_OK: &str = "OK";
pub const EN_BTN_SAVE: &str = "Save (Ctrl+S)";

pub const EN_COL_PROPERTY: &str = "Property";
pub const EN_COL_VALUE: &str = "Value";
pub const EN_ROW_PATH: &str = "Path";
pub const EN_ROW_TYPE: &str = "Type";

pub const EN_SELECT_LEAF: &str = "Select a \"key: value\" node to edit it.";
pub const EN_BADGE_DIRTY: &str = "modified";

pub const EN_ITEM_UNNAMED: &str = "Unnamed";
pub const EN_ROOT_LABEL: &str = "Model";

// Label separator between a leaf's key and its value text.
pub const LABEL_SEPARATOR: &str = ": ";

// Newline constants (used for save formatting; keep out of value code).
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";

// Width of one indentation level in saved files.
pub const INDENT_WIDTH: usize = 4;

// UTF-8 byte-order marker tolerated at the start of loaded files.
pub const UTF8_BOM: char = '\u{feff}';

pub const EN_TYPE_NULL: &str = "null";
pub const EN_TYPE_BOOL: &str = "bool";
pub const EN_TYPE_INTEGER: &str = "integer";
pub const EN_TYPE_FLOAT: &str = "float";
pub const EN_TYPE_STRING: &str = "string";
pub const EN_TYPE_ARRAY: &str = "array";
pub const EN_TYPE_OBJECT: &str = "object";

pub const EN_LITERAL_NULL: &str = "null";

// Tabular model (.bim) structure keys (BIM_ prefix)
pub const BIM_NAME: &str = "name";
pub const BIM_COMPATIBILITY_LEVEL: &str = "compatibilityLevel";
pub const BIM_MODEL: &str = "model";

pub const BIM_DATA_SOURCES: &str = "dataSources";
pub const BIM_TABLES: &str = "tables";
pub const BIM_RELATIONSHIPS: &str = "relationships";
pub const BIM_PERSPECTIVES: &str = "perspectives";
pub const BIM_ANNOTATIONS: &str = "annotations";
pub const BIM_TRANSLATIONS: &str = "translations";

// Top-level root fields shown directly under the root node, in display order.
pub const BIM_ROOT_FIELDS: [&str; 2] = [BIM_NAME, BIM_COMPATIBILITY_LEVEL];

// Collections under `model`, in display order.
pub const BIM_COLLECTIONS: [&str; 6] = [
    BIM_DATA_SOURCES,
    BIM_TABLES,
    BIM_RELATIONSHIPS,
    BIM_PERSPECTIVES,
    BIM_ANNOTATIONS,
    BIM_TRANSLATIONS,
];
