use super::entry::File;

/// Coarse file category derived from the MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Images,
    Videos,
    Audio,
    Documents,
    Other,
}

impl FileCategory {
    /// Display order.
    pub const ALL: [FileCategory; 5] = [
        Self::Images,
        Self::Videos,
        Self::Audio,
        Self::Documents,
        Self::Other,
    ];

    pub fn from_mime(mime_type: Option<&str>) -> Self {
        let Some(mime) = mime_type else {
            return Self::Other;
        };
        let mime = mime.to_ascii_lowercase();

        if mime.starts_with("image/") {
            Self::Images
        } else if mime.starts_with("video/") {
            Self::Videos
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.starts_with("text/")
            || mime == "application/pdf"
            || mime == "application/rtf"
            || mime == "application/msword"
            || mime.starts_with("application/vnd.openxmlformats-officedocument")
            || mime.starts_with("application/vnd.ms-")
            || mime.starts_with("application/vnd.oasis.opendocument")
        {
            Self::Documents
        } else {
            Self::Other
        }
    }

    pub fn of(file: &File) -> Self {
        Self::from_mime(file.mime_type.as_deref())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Documents => "Documents",
            Self::Other => "Other",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Images => 0,
            Self::Videos => 1,
            Self::Audio => 2,
            Self::Documents => 3,
            Self::Other => 4,
        }
    }
}

/// Count and byte total for one category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTally {
    pub count: usize,
    pub bytes: u64,
}

/// Per-category summary of the displayed files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileCategoryStats {
    tallies: [CategoryTally; 5],
}

impl FileCategoryStats {
    pub fn from_files(files: &[File]) -> Self {
        let mut stats = Self::default();
        for file in files {
            let tally = &mut stats.tallies[FileCategory::of(file).index()];
            tally.count += 1;
            tally.bytes += file.size.unwrap_or(0);
        }
        stats
    }

    pub fn get(&self, category: FileCategory) -> CategoryTally {
        self.tallies[category.index()]
    }

    pub fn total_count(&self) -> usize {
        self.tallies.iter().map(|t| t.count).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.tallies.iter().map(|t| t.bytes).sum()
    }

    /// Categories in display order with their tallies.
    pub fn iter(&self) -> impl Iterator<Item = (FileCategory, CategoryTally)> + '_ {
        FileCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}
