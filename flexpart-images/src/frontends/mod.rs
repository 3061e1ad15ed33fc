mod flexpart;

pub use flexpart::{FlexpartFrontend, LABEL_FINGERPRINT};

#[cfg(test)]
pub use flexpart::{CONVERT2_DOCKERFILE, FLEXPART_DOCKERFILE};
