use crate::config::LayoutConfig;
use crate::context::LayoutContext;
use crate::node::Element;
use crate::node_kind::ContainerType;
use crate::template::RenderTemplate;
use crate::tree::NodeTree;
use anchorage_style::{ComputedStyle, Display, Float};
use anchorage_traits::{InMemoryResources, StackedFlowMeasure};
use anchorage_types::{BoxRect, NodeId};

/// Builds measured trees for tests. Children are appended in document order.
pub struct TreeBuilder {
    tree: NodeTree,
}

impl TreeBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        let root = Element::new(
            "body",
            ComputedStyle::default(),
            BoxRect::new(0.0, 0.0, width, height),
        );
        Self {
            tree: NodeTree::new(root),
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn child(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.tree.append(parent, element).unwrap()
    }

    pub fn build(self) -> NodeTree {
        self.tree
    }
}

fn styled(tag: &str, display: Display, left: f32, top: f32, width: f32, height: f32) -> Element {
    let style = ComputedStyle {
        display,
        ..Default::default()
    };
    Element::new(tag, style, BoxRect::new(left, top, width, height))
}

pub fn block(left: f32, top: f32, width: f32, height: f32) -> Element {
    styled("div", Display::Block, left, top, width, height)
}

pub fn inline(left: f32, top: f32, width: f32, height: f32) -> Element {
    styled("span", Display::Inline, left, top, width, height)
}

pub fn text(content: &str, left: f32, top: f32, width: f32, height: f32) -> Element {
    let mut element = Element::text(
        content,
        ComputedStyle::default(),
        BoxRect::new(left, top, width, height),
    );
    element.baseline = Some(height * 0.8);
    element
}

pub fn floated(float: Float, left: f32, top: f32, width: f32, height: f32) -> Element {
    let mut element = block(left, top, width, height);
    element.style.float = float;
    element
}

pub fn with_context<R>(tree: NodeTree, f: impl FnOnce(&mut LayoutContext<'_>) -> R) -> R {
    with_config(tree, LayoutConfig::default(), f)
}

pub fn with_config<R>(
    tree: NodeTree,
    config: LayoutConfig,
    f: impl FnOnce(&mut LayoutContext<'_>) -> R,
) -> R {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut resources = InMemoryResources::new();
    let measure = StackedFlowMeasure;
    let mut ctx = LayoutContext::new(tree, config, &mut resources, &measure);
    f(&mut ctx)
}

/// Renders `parent` as a `container` holding `children`, the way the
/// controller leaves them before placement. Children without a type become
/// plain views.
pub fn render_under(
    ctx: &mut LayoutContext<'_>,
    parent: NodeId,
    container: ContainerType,
    children: &[NodeId],
) {
    {
        let view = ctx.view_mut(parent);
        view.container_type = container;
        view.rendered = true;
    }
    ctx.assign_document_id(parent, container);
    for &child in children {
        let child_type = match ctx.node(child).container_type() {
            ContainerType::Unknown => ContainerType::Block,
            other => other,
        };
        {
            let view = ctx.view_mut(child);
            view.container_type = child_type;
            view.render_parent = Some(parent);
            view.rendered = true;
        }
        ctx.assign_document_id(child, child_type);
        ctx.templates
            .push(Some(parent), RenderTemplate::xml(child, child_type.control_name()))
            .unwrap();
    }
}
