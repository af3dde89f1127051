// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::key::FontId;

/// Error returned by atlas operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the font and codepoint of the
/// request that failed, when the failure is tied to a glyph.
///
/// None of these errors is fatal: a full cache is expected to clear after the
/// next [`flush`](crate::FontManager::flush).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The font of the failed request, if any.
    font: Option<FontId>,

    /// The codepoint of the failed request, if any.
    codepoint: Option<u32>,

    /// Static detail for configuration and data errors.
    detail: Option<&'static str>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The font of the request that failed, if the error concerns a glyph or font.
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    /// The codepoint of the request that failed, if the error concerns a glyph.
    pub fn codepoint(&self) -> Option<u32> {
        self.codepoint
    }

    /// Returns true if the caller can retry the request after a flush.
    pub fn is_cache_full(&self) -> bool {
        matches!(self.kind, ErrorKind::CacheFull | ErrorKind::TooManyGlyphs)
    }

    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            font: None,
            codepoint: None,
            detail: None,
        }
    }

    fn glyph(kind: ErrorKind, font: FontId, codepoint: u32) -> Self {
        Self {
            font: Some(font),
            codepoint: Some(codepoint),
            ..Self::new(kind)
        }
    }

    pub(crate) fn invalid_font(font: FontId) -> Self {
        Self {
            font: Some(font),
            ..Self::new(ErrorKind::InvalidFont)
        }
    }

    pub(crate) fn invalid_glyph_font(font: FontId, codepoint: u32) -> Self {
        Self::glyph(ErrorKind::InvalidFont, font, codepoint)
    }

    pub(crate) fn invalid_icon(codepoint: u32) -> Self {
        Self::glyph(ErrorKind::InvalidIcon, FontId::ICON, codepoint)
    }

    pub(crate) fn cache_full(font: FontId, codepoint: u32) -> Self {
        Self::glyph(ErrorKind::CacheFull, font, codepoint)
    }

    pub(crate) fn too_many_glyphs(font: FontId, codepoint: u32) -> Self {
        Self::glyph(ErrorKind::TooManyGlyphs, font, codepoint)
    }

    pub(crate) fn invalid_icon_bundle(detail: &'static str) -> Self {
        Self {
            detail: Some(detail),
            ..Self::new(ErrorKind::InvalidIconBundle)
        }
    }

    pub(crate) fn invalid_font_data(detail: &'static str) -> Self {
        Self {
            detail: Some(detail),
            ..Self::new(ErrorKind::InvalidFontData)
        }
    }

    pub(crate) fn unsupported(font: FontId, detail: &'static str) -> Self {
        Self {
            font: Some(font),
            detail: Some(detail),
            ..Self::new(ErrorKind::Unsupported)
        }
    }

    pub(crate) fn invalid_config(detail: &'static str) -> Self {
        Self {
            detail: Some(detail),
            ..Self::new(ErrorKind::InvalidConfig)
        }
    }

    pub(crate) fn already_initialized() -> Self {
        Self::new(ErrorKind::AlreadyInitialized)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidFont => match self.font {
                Some(font) => write!(f, "invalid font {}", font.to_u16()),
                None => write!(f, "invalid font"),
            },
            ErrorKind::InvalidIcon => write!(
                f,
                "icon {} is outside the icon bundle",
                self.codepoint.unwrap_or_default()
            ),
            ErrorKind::CacheFull => write!(
                f,
                "glyph cache is full for this frame (codepoint {})",
                self.codepoint.unwrap_or_default()
            ),
            ErrorKind::TooManyGlyphs => write!(
                f,
                "too many glyphs this frame (codepoint {})",
                self.codepoint.unwrap_or_default()
            ),
            ErrorKind::InvalidIconBundle => {
                write!(f, "invalid icon bundle: {}", self.detail.unwrap_or("bad size"))
            }
            ErrorKind::InvalidFontData => {
                write!(f, "invalid font data: {}", self.detail.unwrap_or("no faces"))
            }
            ErrorKind::Unsupported => {
                write!(f, "unsupported: {}", self.detail.unwrap_or("missing table"))
            }
            ErrorKind::InvalidConfig => {
                write!(f, "invalid atlas config: {}", self.detail.unwrap_or("bad layout"))
            }
            ErrorKind::AlreadyInitialized => {
                write!(f, "an exclusive font manager already exists")
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The font id is zero, reserved, or not known to the rasterizer.
    InvalidFont,

    /// An icon codepoint is outside the imported icon bundle.
    InvalidIcon,

    /// Every cell was already used during the current frame.
    CacheFull,

    /// The cache filled up between looking a glyph up and claiming a cell for it.
    TooManyGlyphs,

    /// Icon bundle data is not a whole number of cells.
    InvalidIconBundle,

    /// Imported bytes do not contain a usable font face.
    InvalidFontData,

    /// The font lacks the table required by the query.
    Unsupported,

    /// The atlas configuration cannot be laid out.
    InvalidConfig,

    /// An exclusive manager is already alive.
    AlreadyInitialized,
}
