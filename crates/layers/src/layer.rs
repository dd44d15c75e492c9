/// Identifier of one painting stage of the globe scene.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// A stage that writes one aspect of the scene (polygon color or marker
/// visibility) and never touches the others.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
