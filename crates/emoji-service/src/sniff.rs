//! Image type detection from the leading bytes of a stream
//!
//! Only the first non-empty chunk is inspected. The payload itself is never buffered,
//! the peeked chunk is replayed in front of the untouched remainder.

use bytes::Bytes;
use emoji_error::{bail, BoxError, Error, ErrorType, Result};
use futures_util::{future, stream, stream::BoxStream, Stream, StreamExt};
use std::any::Any;
use strum::IntoStaticStr;

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const TIFF_LE_SIGNATURE: &[u8] = &[0x49, 0x49, 0x2A, 0x00];
const TIFF_BE_SIGNATURE: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A];

pub type ByteStream = BoxStream<'static, Result<Bytes, BoxError>>;

#[derive(Clone, Copy, Debug, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    #[strum(serialize = "jpg")]
    Jpeg,
    Png,
    Gif,
    WebP,
    Flif,
    Cr2,
    #[strum(serialize = "tif")]
    Tiff,
    Bmp,
    Jxr,
    Psd,
    Ico,
}

impl ImageFormat {
    /// Match the buffer against the known image signatures
    #[must_use]
    pub fn detect(buf: &[u8]) -> Option<Self> {
        let is_tiff = buf.starts_with(TIFF_LE_SIGNATURE) || buf.starts_with(TIFF_BE_SIGNATURE);

        let format = if buf.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if buf.starts_with(PNG_SIGNATURE) {
            Self::Png
        } else if buf.starts_with(b"GIF") {
            Self::Gif
        } else if buf.get(8..12) == Some(&b"WEBP"[..]) {
            Self::WebP
        } else if buf.starts_with(b"FLIF") {
            Self::Flif
        } else if is_tiff && buf.get(8..10) == Some(&b"CR"[..]) {
            Self::Cr2
        } else if is_tiff {
            Self::Tiff
        } else if buf.starts_with(b"BM") {
            Self::Bmp
        } else if buf.starts_with(&[0x49, 0x49, 0xBC]) {
            Self::Jxr
        } else if buf.starts_with(b"8BPS") {
            Self::Psd
        } else if buf.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
            Self::Ico
        } else {
            return None;
        };

        Some(format)
    }

    /// File extension, without the leading dot
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Flif => "image/flif",
            Self::Cr2 => "image/x-canon-cr2",
            Self::Tiff => "image/tiff",
            Self::Bmp => "image/bmp",
            Self::Jxr => "image/vnd.ms-photo",
            Self::Psd => "image/vnd.adobe.photoshop",
            Self::Ico => "image/x-icon",
        }
    }
}

/// Raw image input, either still arriving or already in memory
pub enum ImageInput {
    Stream(ByteStream),
    Buffer(Bytes),
}

impl ImageInput {
    pub fn stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self::Stream(stream.map(|chunk| chunk.map_err(Into::into)).boxed())
    }

    /// Convert a dynamically typed value
    ///
    /// Supported are [`Bytes`], `Vec<u8>`, `&'static [u8]` and [`ByteStream`].
    /// Everything else is rejected with [`ErrorType::InvalidInputKind`].
    pub fn from_dyn(value: Box<dyn Any + Send>) -> Result<Self> {
        let value = match value.downcast::<Bytes>() {
            Ok(bytes) => return Ok(Self::Buffer(*bytes)),
            Err(value) => value,
        };
        let value = match value.downcast::<Vec<u8>>() {
            Ok(vec) => return Ok(Self::Buffer(Bytes::from(*vec))),
            Err(value) => value,
        };
        let value = match value.downcast::<&'static [u8]>() {
            Ok(slice) => return Ok(Self::Buffer(Bytes::from_static(*slice))),
            Err(value) => value,
        };

        let Ok(stream) = value.downcast::<ByteStream>() else {
            bail!(
                type = ErrorType::InvalidInputKind,
                "expected a byte stream or a buffer"
            );
        };

        Ok(Self::Stream(*stream))
    }
}

impl From<Bytes> for ImageInput {
    fn from(value: Bytes) -> Self {
        Self::Buffer(value)
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(value: Vec<u8>) -> Self {
        Self::Buffer(value.into())
    }
}

impl From<&'static [u8]> for ImageInput {
    fn from(value: &'static [u8]) -> Self {
        Self::Buffer(Bytes::from_static(value))
    }
}

impl From<ByteStream> for ImageInput {
    fn from(value: ByteStream) -> Self {
        Self::Stream(value)
    }
}

/// Image stream whose type has been verified
///
/// The stream is still live: it yields the peeked chunk first, then whatever the source still produces
pub struct ValidatedImage {
    format: ImageFormat,
    stream: ByteStream,
}

impl ValidatedImage {
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    #[must_use]
    pub fn into_stream(self) -> ByteStream {
        self.stream
    }
}

/// Peek at the first chunk of the input and detect the image type
pub async fn sniff(input: ImageInput) -> Result<ValidatedImage> {
    let mut stream = match input {
        ImageInput::Stream(stream) => stream,
        ImageInput::Buffer(buffer) => stream::once(future::ok(buffer)).boxed(),
    };

    let first_chunk = loop {
        match stream.next().await {
            Some(Ok(chunk)) if chunk.is_empty() => continue,
            Some(Ok(chunk)) => break chunk,
            Some(Err(err)) => return Err(Error::from_boxed(err)),
            None => {
                bail!(
                    type = ErrorType::EmptyInput,
                    "image input ended before yielding any data"
                );
            }
        }
    };

    let Some(format) = ImageFormat::detect(&first_chunk) else {
        // Dropping the source releases whatever is backing it
        drop(stream);
        bail!(type = ErrorType::NotAnImage, "not an image");
    };

    debug!(extension = format.extension(), "detected image type");

    let replayed = stream::once(future::ok(first_chunk)).chain(stream).boxed();
    Ok(ValidatedImage {
        format,
        stream: replayed,
    })
}
