use mamba_input::Event;
use std::collections::BTreeMap;

/// A pluggable unit of per-frame update/render/event logic.
///
/// `C` is the application context handed to every hook (renderer, window
/// state, ...). Layers are looked up by [`Layer::name`], so names should be
/// unique within a stack.
pub trait Layer<C>: 'static {
    fn name(&self) -> &'static str;

    fn on_event(&mut self, _event: &mut Event, _ctx: &mut LayerCtx<'_, C>) {}

    fn on_update(&mut self, _dt: f32, _ctx: &mut LayerCtx<'_, C>) {}

    fn on_render(&mut self, _ctx: &mut LayerCtx<'_, C>) {}
}

pub type BoxedLayer<C> = Box<dyn Layer<C>>;

/// Context passed to layer hooks while the stack is being iterated.
///
/// Replacement requests made through it are staged and only committed by
/// [`LayerStack::apply_pending_transitions`].
pub struct LayerCtx<'a, C> {
    pub app: &'a mut C,
    index: usize,
    names: &'a [&'static str],
    pending: &'a mut BTreeMap<usize, BoxedLayer<C>>,
}

impl<C> LayerCtx<'_, C> {
    /// Position of the calling layer in the stack.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stage replacement of the calling layer.
    pub fn transition_to(&mut self, layer: impl Layer<C>) {
        self.pending.insert(self.index, Box::new(layer));
    }

    /// Stage replacement of the first layer named `old`. Returns false if no
    /// such layer is in the stack.
    pub fn replace(&mut self, old: &str, layer: impl Layer<C>) -> bool {
        stage(self.names, self.pending, old, Box::new(layer))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name)
    }
}

fn stage<C>(
    names: &[&'static str],
    pending: &mut BTreeMap<usize, BoxedLayer<C>>,
    old: &str,
    layer: BoxedLayer<C>,
) -> bool {
    match names.iter().position(|n| *n == old) {
        Some(index) => {
            // Last request for an index wins.
            pending.insert(index, layer);
            true
        }
        None => false,
    }
}

/// Ordered layers plus the transitions staged during the current frame.
///
/// Update and render run back-to-front (the first pushed layer runs last and
/// so draws on top); events run front-to-back and stop once handled.
pub struct LayerStack<C> {
    layers: Vec<BoxedLayer<C>>,
    /// Parallel to `layers`; readable while a layer is mutably borrowed.
    names: Vec<&'static str>,
    pending: BTreeMap<usize, BoxedLayer<C>>,
}

impl<C> Default for LayerStack<C> {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            names: Vec::new(),
            pending: BTreeMap::new(),
        }
    }
}

impl<C: 'static> LayerStack<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: impl Layer<C>) {
        self.push_boxed(Box::new(layer));
    }

    pub fn push_boxed(&mut self, layer: BoxedLayer<C>) {
        tracing::debug!("pushing layer {} at {}", layer.name(), self.layers.len());
        self.names.push(layer.name());
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in stack order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Layer<C>> {
        self.position(name).map(|i| self.layers[i].as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn Layer<C>> {
        let index = self.position(name)?;
        Some(self.layers[index].as_mut())
    }

    /// Stage replacement of the first layer named `old` by `layer`.
    ///
    /// Nothing changes until [`Self::apply_pending_transitions`].
    pub fn replace(&mut self, old: &str, layer: impl Layer<C>) -> bool {
        stage(&self.names, &mut self.pending, old, Box::new(layer))
    }

    /// Number of replacements staged for the next commit.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Commit all staged replacements. The stack size never changes.
    pub fn apply_pending_transitions(&mut self) {
        for (index, layer) in std::mem::take(&mut self.pending) {
            tracing::debug!(
                "layer transition at {index}: {} -> {}",
                self.names[index],
                layer.name()
            );
            self.names[index] = layer.name();
            self.layers[index] = layer;
        }
    }

    pub fn update(&mut self, dt: f32, app: &mut C) {
        for (index, layer) in self.layers.iter_mut().enumerate().rev() {
            let mut ctx = LayerCtx {
                app: &mut *app,
                index,
                names: &self.names,
                pending: &mut self.pending,
            };
            layer.on_update(dt, &mut ctx);
        }
    }

    pub fn render(&mut self, app: &mut C) {
        for (index, layer) in self.layers.iter_mut().enumerate().rev() {
            let mut ctx = LayerCtx {
                app: &mut *app,
                index,
                names: &self.names,
                pending: &mut self.pending,
            };
            layer.on_render(&mut ctx);
        }
    }

    /// Dispatch front-to-back until a layer handles the event. Returns
    /// whether it was handled.
    pub fn dispatch(&mut self, event: &mut Event, app: &mut C) -> bool {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            let mut ctx = LayerCtx {
                app: &mut *app,
                index,
                names: &self.names,
                pending: &mut self.pending,
            };
            layer.on_event(event, &mut ctx);
            if event.handled {
                tracing::trace!("{event} handled by {}", self.names[index]);
                break;
            }
        }
        event.handled
    }
}
