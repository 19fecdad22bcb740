//! Static descriptors for the container/codec formats shnwave knows about

/// How a format participates in header handling.
///
/// The kluge layer dispatches on this instead of on format names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Readable and writable, headers are trusted as-is
    Plain,
    /// A different container translated to WAVE on the fly by an encoder
    /// that cannot seek back to fix the size fields
    TranslatedContainer,
    /// Decoder emits a data size smaller than the real payload
    SizeUnderreporting,
    OutputOnly,
    InputOnly,
    /// Recognised by magic number, but there is no way to read it
    SniffOnly,
}

#[derive(Debug)]
pub struct FormatDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub extension: &'static str,
    /// Simple byte-level translation of WAVE (e.g. byte-swapped container)
    pub is_translated: bool,
    pub is_compressed: bool,
    pub encoder: Option<&'static str>,
    pub decoder: Option<&'static str>,
    /// Alternative magic numbers, any of which identifies the format
    pub magic: &'static [&'static [u8]],
    pub magic_offset: usize,
    pub kind: FormatKind,
}

impl FormatDescriptor {
    pub fn supports_input(&self) -> bool {
        !matches!(self.kind, FormatKind::OutputOnly | FormatKind::SniffOnly)
    }

    pub fn supports_output(&self) -> bool {
        matches!(
            self.kind,
            FormatKind::Plain | FormatKind::TranslatedContainer | FormatKind::SizeUnderreporting | FormatKind::OutputOnly
        )
    }

    /// Whether file-size checks (truncation, appended junk) mean anything.
    ///
    /// Only true when the bytes on disk are the WAVE stream itself.
    pub fn size_checks_apply(&self) -> bool {
        !self.is_compressed && !self.is_translated
    }

    /// Whether `head` (file start, after any ID3v2 tag) carries this format's magic
    pub fn matches_magic(&self, head: &[u8]) -> bool {
        self.magic.iter().any(|magic| {
            head.len() >= self.magic_offset + magic.len()
                && &head[self.magic_offset..self.magic_offset + magic.len()] == *magic
        })
    }
}

pub static WAV: FormatDescriptor = FormatDescriptor {
    name: "wav",
    description: "RIFF WAVE file format",
    extension: "wav",
    is_translated: false,
    is_compressed: false,
    encoder: None,
    decoder: None,
    magic: &[b"RIFF"],
    magic_offset: 0,
    kind: FormatKind::Plain,
};

pub static AIFF: FormatDescriptor = FormatDescriptor {
    name: "aiff",
    description: "Audio Interchange File Format (AIFF and uncompressed/sowt AIFF-C only)",
    extension: "aiff",
    is_translated: true,
    is_compressed: false,
    encoder: Some("sox"),
    decoder: Some("sox"),
    magic: &[b"FORM"],
    magic_offset: 0,
    kind: FormatKind::TranslatedContainer,
};

pub static APE: FormatDescriptor = FormatDescriptor {
    name: "ape",
    description: "Monkey's Audio Compressor",
    extension: "ape",
    is_translated: false,
    is_compressed: true,
    encoder: Some("mac"),
    decoder: Some("mac"),
    magic: &[b"MAC "],
    magic_offset: 0,
    kind: FormatKind::SizeUnderreporting,
};

pub static SHN: FormatDescriptor = FormatDescriptor {
    name: "shn",
    description: "Shorten low complexity waveform coder",
    extension: "shn",
    is_translated: false,
    is_compressed: true,
    encoder: Some("shorten"),
    decoder: Some("shorten"),
    magic: &[b"ajkg"],
    magic_offset: 0,
    kind: FormatKind::Plain,
};

pub static FLAC: FormatDescriptor = FormatDescriptor {
    name: "flac",
    description: "Free Lossless Audio Codec",
    extension: "flac",
    is_translated: false,
    is_compressed: true,
    encoder: Some("flac"),
    decoder: Some("flac"),
    magic: &[b"fLaC"],
    magic_offset: 0,
    kind: FormatKind::Plain,
};

pub static WV: FormatDescriptor = FormatDescriptor {
    name: "wv",
    description: "WavPack Hybrid Lossless Audio Compression",
    extension: "wv",
    is_translated: false,
    is_compressed: true,
    encoder: Some("wavpack"),
    decoder: Some("wvunpack"),
    magic: &[b"wvpk"],
    magic_offset: 0,
    kind: FormatKind::Plain,
};

pub static OFR: FormatDescriptor = FormatDescriptor {
    name: "ofr",
    description: "OptimFROG Lossless WAVE Audio Coder",
    extension: "ofr",
    is_translated: false,
    is_compressed: true,
    encoder: Some("ofr"),
    decoder: Some("ofr"),
    magic: &[b"OFR ", b"*RIFF"],
    magic_offset: 0,
    kind: FormatKind::Plain,
};

pub static LPAC: FormatDescriptor = FormatDescriptor {
    name: "lpac",
    description: "LPAC - Lossless Predictive Audio Compression",
    extension: "pac",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: Some("lpac"),
    magic: &[b"LPAC"],
    magic_offset: 0,
    kind: FormatKind::InputOnly,
};

pub static TTA: FormatDescriptor = FormatDescriptor {
    name: "tta",
    description: "TTA Lossless Audio Codec",
    extension: "tta",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: Some("ttaenc"),
    magic: &[b"TTA1"],
    magic_offset: 0,
    kind: FormatKind::InputOnly,
};

pub static ALAC: FormatDescriptor = FormatDescriptor {
    name: "alac",
    description: "Apple Lossless Audio Codec",
    extension: "m4a",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: Some("alac"),
    magic: &[b"M4A "],
    magic_offset: 8,
    kind: FormatKind::InputOnly,
};

pub static TAK: FormatDescriptor = FormatDescriptor {
    name: "tak",
    description: "(T)om's lossless (A)udio (K)ompressor",
    extension: "tak",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: Some("takc"),
    magic: &[b"tBaK"],
    magic_offset: 0,
    kind: FormatKind::InputOnly,
};

pub static RKA: FormatDescriptor = FormatDescriptor {
    name: "rka",
    description: "RKA Audio audio compressor",
    extension: "rka",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: Some("rkau"),
    magic: &[b"RKA7"],
    magic_offset: 0,
    kind: FormatKind::InputOnly,
};

pub static WMA: FormatDescriptor = FormatDescriptor {
    name: "wma",
    description: "Windows Media Audio Lossless",
    extension: "wma",
    is_translated: false,
    is_compressed: true,
    encoder: None,
    decoder: None,
    magic: &[&[0x30, 0x26, 0xb2, 0x75]],
    magic_offset: 0,
    kind: FormatKind::SniffOnly,
};

pub static CUST: FormatDescriptor = FormatDescriptor {
    name: "cust",
    description: "custom output format module",
    extension: "custom",
    is_translated: false,
    is_compressed: false,
    encoder: None,
    decoder: None,
    magic: &[],
    magic_offset: 0,
    kind: FormatKind::OutputOnly,
};

pub static NULL: FormatDescriptor = FormatDescriptor {
    name: "null",
    description: "sends output to /dev/null",
    extension: "null",
    is_translated: false,
    is_compressed: false,
    encoder: None,
    decoder: None,
    magic: &[],
    magic_offset: 0,
    kind: FormatKind::OutputOnly,
};

/// All known formats, in sniffing order
pub static FORMATS: &[&FormatDescriptor] = &[
    &WAV, &AIFF, &SHN, &FLAC, &APE, &WV, &OFR, &LPAC, &TTA, &ALAC, &TAK, &RKA, &WMA, &CUST, &NULL,
];

pub fn find_format(name: &str) -> Option<&'static FormatDescriptor> {
    FORMATS.iter().copied().find(|f| f.name == name)
}

/// First readable-or-recognisable format whose magic matches `head`
pub fn sniff_format(head: &[u8]) -> Option<&'static FormatDescriptor> {
    FORMATS
        .iter()
        .copied()
        .filter(|f| f.kind != FormatKind::OutputOnly)
        .find(|f| f.matches_magic(head))
}
