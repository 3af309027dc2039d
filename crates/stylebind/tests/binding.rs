//! End-to-end binding semantics, exercised through a hand-expanded binder
//! whose body matches the generator's output for the same declarations.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use stylebind::{
    drawable_compat, AttrValue, AttributeSet, BindArgs, BindError, ColorStateList, Context,
    Drawable, Dynamic, Resources, StyledValues, StyledView, Theme, ViewClass,
};

const BOOL_KEY: i32 = 1;
const COLOR_KEY: i32 = 2;
const OVERLAY_KEY: i32 = 3;
const CORNER_KEY: i32 = 4;
const THICKNESS_KEY: i32 = 5;
const ICON_KEY: i32 = 6;
const INT_KEY: i32 = 7;
const TITLE_KEY: i32 = 8;
const STYLEABLE: &[i32] = &[
    BOOL_KEY, COLOR_KEY, OVERLAY_KEY, CORNER_KEY, THICKNESS_KEY, ICON_KEY, INT_KEY, TITLE_KEY,
];

static TOOLKIT_VIEW: ViewClass =
    ViewClass { name: "View", module_path: "toolkit::widget", parent: None };
static SAMPLE_VIEW: ViewClass =
    ViewClass { name: "SampleView", module_path: "app::widgets", parent: Some(&TOOLKIT_VIEW) };

struct SampleView {
    ctx: Context,
    show_label: Dynamic<bool>,
    accent: u32,
    overlay: Dynamic<Option<ColorStateList>>,
    corner: i32,
    thickness: f32,
    icon: Option<Drawable>,
    count: Dynamic<i32>,
    title: String,
}

impl SampleView {
    fn new(ctx: Context, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
        let bool_log = Arc::clone(&log);
        let overlay_log = Arc::clone(&log);
        let count_log = log;
        SampleView {
            ctx,
            show_label: Dynamic::with_hook(false, move |_, _| bool_log.lock().push("show_label")),
            accent: 0xFF00_0000,
            overlay: Dynamic::with_hook(None, move |_, _| overlay_log.lock().push("overlay")),
            corner: 4,
            thickness: 1.5,
            icon: None,
            count: Dynamic::with_hook(66, move |_, _| count_log.lock().push("count")),
            title: "default".to_string(),
        }
    }
}

impl StyledView for SampleView {
    fn class_info(&self) -> &'static ViewClass {
        &SAMPLE_VIEW
    }

    fn context(&self) -> &Context {
        &self.ctx
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct SampleViewAttrBinding;

impl SampleViewAttrBinding {
    #[allow(clippy::too_many_arguments)]
    fn bind(
        view: &mut SampleView,
        attrs: Option<&AttributeSet>,
        styleable: &[i32],
        def_style_attr: i32,
        def_style_res: i32,
        action: Option<&dyn Fn(&StyledValues)>,
    ) -> Result<(), BindError> {
        let a = StyledView::context(view).theme().obtain_styled(
            attrs,
            styleable,
            def_style_attr,
            def_style_res,
        );
        view.show_label.set(a.get_bool(BOOL_KEY, *view.show_label.get()));
        view.accent = a.get_color(COLOR_KEY, view.accent);
        let current = view.overlay.get().clone();
        view.overlay.set(a.get_color_state_list(OVERLAY_KEY).or(current));
        view.corner = a.get_dimension(CORNER_KEY, view.corner as f32) as i32;
        view.thickness = a.get_dimension(THICKNESS_KEY, view.thickness);
        view.icon =
            drawable_compat(&a, StyledView::context(view), ICON_KEY)?.or_else(|| view.icon.clone());
        view.count.set(a.get_int(INT_KEY, *view.count.get()));
        view.title = a.get_string(TITLE_KEY).unwrap_or_else(|| view.title.clone());
        if let Some(action) = action {
            action(&a);
        }
        Ok(())
    }
}

fn sample_view_bind_dyn(
    view: &mut dyn StyledView,
    args: &BindArgs<'_>,
) -> Result<(), BindError> {
    match view.as_any_mut().downcast_mut::<SampleView>() {
        Some(view) => SampleViewAttrBinding::bind(
            view,
            args.attrs,
            args.styleable,
            args.def_style_attr,
            args.def_style_res,
            args.action,
        ),
        None => Err(BindError::wrong_instance_type(
            "app::widgets::SampleViewAttrBinding",
            "app::widgets::SampleView",
        )),
    }
}

fn recent_context(theme: Theme) -> Context {
    Context::new(theme, Resources::new(), 30)
}

fn log() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn absent_key_keeps_the_current_value() {
    let mut view = SampleView::new(recent_context(Theme::new()), log());
    SampleViewAttrBinding::bind(&mut view, None, STYLEABLE, 0, 0, None).unwrap();
    assert_eq!(*view.count.get(), 66);
    assert_eq!(view.title, "default");
}

#[test]
fn present_key_assigns_and_fires_the_hook_once() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let observed2 = Arc::clone(&observed);
    let mut view = SampleView::new(recent_context(Theme::new()), log());
    view.count = Dynamic::with_hook(66, move |old, new| observed2.lock().push((*old, *new)));

    let attrs = AttributeSet::new().set(INT_KEY, AttrValue::Int(10));
    SampleViewAttrBinding::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, None).unwrap();

    assert_eq!(*view.count.get(), 10);
    assert_eq!(*observed.lock(), vec![(66, 10)]);
}

#[test]
fn assignments_apply_in_declaration_order() {
    let order = log();
    let mut view = SampleView::new(recent_context(Theme::new()), Arc::clone(&order));
    SampleViewAttrBinding::bind(&mut view, None, STYLEABLE, 0, 0, None).unwrap();
    assert_eq!(*order.lock(), vec!["show_label", "overlay", "count"]);
}

#[test]
fn every_kind_extracts_its_native_value() {
    let attrs = AttributeSet::new()
        .set(BOOL_KEY, AttrValue::Bool(true))
        .set(COLOR_KEY, AttrValue::Color(0xFFF1_BB5A))
        .set(OVERLAY_KEY, AttrValue::ColorState(ColorStateList::new(0xFF11_2233)))
        .set(CORNER_KEY, AttrValue::Dimension(12.7))
        .set(THICKNESS_KEY, AttrValue::Dimension(2.25))
        .set(INT_KEY, AttrValue::Int(3))
        .set(TITLE_KEY, AttrValue::Str("styled".into()));

    let mut view = SampleView::new(recent_context(Theme::new()), log());
    SampleViewAttrBinding::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, None).unwrap();

    assert!(*view.show_label.get());
    assert_eq!(view.accent, 0xFFF1_BB5A);
    assert_eq!(view.overlay.get().as_ref().map(|c| c.default_color), Some(0xFF11_2233));
    assert_eq!(view.corner, 12);
    assert_eq!(view.thickness, 2.25);
    assert_eq!(*view.count.get(), 3);
    assert_eq!(view.title, "styled");
}

#[test]
fn theme_style_layers_fill_in_missing_instance_values() {
    let theme = Theme::new()
        .set_style(40, INT_KEY, AttrValue::Int(8))
        .set_default(TITLE_KEY, AttrValue::Str("themed".into()));
    let mut view = SampleView::new(recent_context(theme), log());
    SampleViewAttrBinding::bind(&mut view, None, STYLEABLE, 40, 0, None).unwrap();
    assert_eq!(*view.count.get(), 8);
    assert_eq!(view.title, "themed");
}

#[test]
fn drawable_loads_through_resources_on_old_platforms() {
    let resources = Resources::new().add_drawable(501);
    let ctx = Context::new(Theme::new(), resources, 21);
    let mut view = SampleView::new(ctx, log());

    let attrs = AttributeSet::new().set(ICON_KEY, AttrValue::Resource(501));
    SampleViewAttrBinding::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, None).unwrap();
    assert_eq!(view.icon, Some(Drawable { resource_id: 501 }));
}

#[test]
fn failing_extraction_still_releases_the_snapshot_once() {
    // Platform 21 takes the compat path; resource 502 is not registered, so
    // the drawable step fails mid-binder.
    let ctx = Context::new(Theme::new(), Resources::new(), 21);
    let theme = ctx.theme().clone();
    let mut view = SampleView::new(ctx, log());

    let attrs = AttributeSet::new()
        .set(COLOR_KEY, AttrValue::Color(0xFF00_FF00))
        .set(ICON_KEY, AttrValue::Resource(502))
        .set(INT_KEY, AttrValue::Int(10));

    let err = SampleViewAttrBinding::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, None)
        .unwrap_err();
    assert!(matches!(err.kind, stylebind::BindErrorKind::MissingResource { id: 502 }));

    assert_eq!(theme.release_count(), 1);
    // Assignments before the failing step applied; those after it did not.
    assert_eq!(view.accent, 0xFF00_FF00);
    assert_eq!(*view.count.get(), 66);
}

#[test]
fn action_runs_against_the_still_open_snapshot() {
    let seen = Arc::new(Mutex::new(None));
    let seen2 = Arc::clone(&seen);
    let attrs = AttributeSet::new().set(TITLE_KEY, AttrValue::Str("from action".into()));
    let mut view = SampleView::new(recent_context(Theme::new()), log());

    let action = move |a: &StyledValues| {
        *seen2.lock() = a.get_string(TITLE_KEY);
    };
    SampleViewAttrBinding::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, Some(&action)).unwrap();

    assert_eq!(seen.lock().as_deref(), Some("from action"));
}

#[test]
fn dispatch_reaches_the_registered_binder() {
    stylebind::register_binder("app::widgets::SampleViewAttrBinding", sample_view_bind_dyn);

    let attrs = AttributeSet::new().set(INT_KEY, AttrValue::Int(42));
    let mut view = SampleView::new(recent_context(Theme::new()), log());
    stylebind::bind(&mut view, Some(&attrs), STYLEABLE, 0, 0, None).unwrap();
    assert_eq!(*view.count.get(), 42);
}
