//! Extension classification for listing icons

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Display category of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    Folder,
    UnknownFile,
    Model3d,
    Archive,
    Data,
    DiskImage,
    Document,
    Executable,
    Image,
    Markup,
    Media,
    Office,
    PlainText,
    SourceCode,
    RuntimeModule,
    Shortcut,
}

impl FileClass {
    /// Short label for text front ends
    pub fn label(self) -> &'static str {
        match self {
            FileClass::Folder => "folder",
            FileClass::UnknownFile => "file",
            FileClass::Model3d => "3d",
            FileClass::Archive => "archive",
            FileClass::Data => "data",
            FileClass::DiskImage => "disk",
            FileClass::Document => "doc",
            FileClass::Executable => "exec",
            FileClass::Image => "image",
            FileClass::Markup => "markup",
            FileClass::Media => "media",
            FileClass::Office => "office",
            FileClass::PlainText => "text",
            FileClass::SourceCode => "source",
            FileClass::RuntimeModule => "module",
            FileClass::Shortcut => "link",
        }
    }
}

const TABLE: &[(FileClass, &[&str])] = &[
    (
        FileClass::Model3d,
        &[
            ".stl", ".ply", ".wrl", ".fbx", ".3mf", ".glb", ".3dm", ".stp", ".step", ".igs",
            ".iges", ".3ds", ".blend",
        ],
    ),
    (
        FileClass::Archive,
        &[".zip", ".tar", ".gz", ".tgz", ".bz2", ".tbz", ".lzh", ".7z", ".rar", ".msi"],
    ),
    (
        FileClass::Data,
        &[
            ".csv", ".xml", ".json", ".db", ".db3", ".sqlite", ".sqlite3", ".sqlitedb", ".mdb",
            ".dat",
        ],
    ),
    (FileClass::DiskImage, &[".iso", ".img", ".vmdk", ".vhd"]),
    (FileClass::Document, &[".pdf", ".xps", ".ps", ".dvi"]),
    (FileClass::Executable, &[".exe", ".bat", ".js", ".vbs", ".sh"]),
    (
        FileClass::Image,
        &[
            ".bmp", ".png", ".jpg", ".jfif", ".jpeg", ".tif", ".tiff", ".gif", ".dicom", ".xbm",
            ".xpm", ".ppm", ".pgm", ".pbm", ".ico", ".svg", ".vml", ".wmf", ".emf", ".eps",
            ".psd", ".ai", ".hdr", ".exr", ".rgbe",
        ],
    ),
    (FileClass::Markup, &[".htm", ".html", ".shtml", ".md", ".rtf"]),
    (
        FileClass::Media,
        &[
            ".wav", ".mid", ".midi", ".mp3", ".flac", ".mpg", ".mpeg", ".mp4", ".wmv", ".wma",
            ".3gp",
        ],
    ),
    (
        FileClass::Office,
        &[
            ".xls", ".xlsx", ".xlsm", ".ppt", ".pptx", ".pptm", ".doc", ".docx", ".docm", ".ods",
            ".odp", ".odt",
        ],
    ),
    (FileClass::PlainText, &[".txt", ".text"]),
    (
        FileClass::SourceCode,
        &[
            ".c", ".cc", ".cpp", ".cxx", ".cs", ".go", ".h", ".hpp", ".hxx", ".vb", ".java",
            ".tex", ".tcl", ".pl", ".py", ".rs", ".rb", ".asp", ".aspx", ".php", ".lua",
        ],
    ),
    (FileClass::RuntimeModule, &[".dll", ".so", ".class", ".sys"]),
    (FileClass::Shortcut, &[".lnk"]),
];

static BY_EXTENSION: Lazy<HashMap<&'static str, FileClass>> = Lazy::new(|| {
    TABLE
        .iter()
        .flat_map(|(class, exts)| exts.iter().map(move |ext| (*ext, *class)))
        .collect()
});

/// Classify a file extension given with its leading dot (".png")
pub fn classify(extension: &str) -> FileClass {
    BY_EXTENSION
        .get(extension.to_lowercase().as_str())
        .copied()
        .unwrap_or(FileClass::UnknownFile)
}

/// Classify a listing entry by name
pub fn classify_name(name: &str, is_dir: bool) -> FileClass {
    if is_dir {
        return FileClass::Folder;
    }
    match Path::new(name).extension() {
        Some(ext) => classify(&format!(".{}", ext.to_string_lossy())),
        None => FileClass::UnknownFile,
    }
}
