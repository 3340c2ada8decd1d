//! A small hand-written schema shared by the integration and property tests.
//!
//! ```text
//! union Shape { Point, Label }
//! table Point { x: int; y: int; }
//! table Label { text: string; }
//! struct Vec2 { x: float; y: float; }
//! table Scene {
//!     name: string; main: Shape; points: [Point]; tags: [string]; scores: [int];
//!     grid: [[int]]; path: [Vec2]; items: [Shape]; child: Scene;
//! }
//! ```
//!
//! [`SceneData`] is the owned mirror of `Scene`, used to write buffers and to compare what is
//! read back.

#![allow(dead_code)]

use flatview::format::field_voffset;
use flatview::format::VOffset;
use flatview::{
    flat_enum, Builder, ByteBuffer, Collection, Error, FlatEnum, InlineStruct, Result, Scalar,
    ScalarVector, StringVector, StructVector, Table, TableOffset, TableVector, TableView, Union,
    UnionValue, UnionVector, VectorOffset, VectorVector,
};
use std::borrow::Cow;

flat_enum! {
    pub struct Shape: u8 {
        NONE = 0,
        Point = 1,
        Label = 2,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Point<'a>(Table<'a>);

impl<'a> Point<'a> {
    pub const X: VOffset = field_voffset(0);
    pub const Y: VOffset = field_voffset(1);

    pub fn x(&self) -> i32 {
        self.0.get(Self::X, 0)
    }

    pub fn y(&self) -> i32 {
        self.0.get(Self::Y, 0)
    }
}

impl<'a> TableView<'a> for Point<'a> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Point(Table::new(buf, pos))
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset> {
        builder.start_table()?;
        builder.add_scalar(Self::X, self.x(), 0)?;
        builder.add_scalar(Self::Y, self.y(), 0)?;
        builder.end_table()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Label<'a>(Table<'a>);

impl<'a> Label<'a> {
    pub const TEXT: VOffset = field_voffset(0);

    pub fn text(&self) -> Option<Cow<'a, str>> {
        self.0.string(Self::TEXT)
    }
}

impl<'a> TableView<'a> for Label<'a> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Label(Table::new(buf, pos))
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset> {
        let text = self.0.clone_string_field(builder, Self::TEXT)?;
        builder.start_table()?;
        if let Some(text) = text {
            builder.add_offset_field(Self::TEXT, text)?;
        }
        builder.end_table()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ShapeValue<'a> {
    None,
    Point(Point<'a>),
    Label(Label<'a>),
    Unknown(Shape),
}

impl<'a> UnionValue<'a> for ShapeValue<'a> {
    type Kind = Shape;

    fn init(kind: Shape, pos: usize, buf: ByteBuffer<'a>) -> Self {
        match kind {
            Shape::NONE => ShapeValue::None,
            Shape::Point => ShapeValue::Point(Point::init(buf, pos)),
            Shape::Label => ShapeValue::Label(Label::init(buf, pos)),
            other => ShapeValue::Unknown(other),
        }
    }

    fn kind(&self) -> Shape {
        match self {
            ShapeValue::None => Shape::NONE,
            ShapeValue::Point(_) => Shape::Point,
            ShapeValue::Label(_) => Shape::Label,
            ShapeValue::Unknown(kind) => *kind,
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<u32> {
        match self {
            ShapeValue::None => Ok(0),
            ShapeValue::Point(point) => Ok(point.clone_to(builder)?.value()),
            ShapeValue::Label(label) => Ok(label.clone_to(builder)?.value()),
            ShapeValue::Unknown(kind) => Err(Error::custom(format!("unknown shape {:?}", kind))),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Vec2<'a> {
    buf: ByteBuffer<'a>,
    pos: usize,
}

impl Vec2<'_> {
    pub fn x(&self) -> f32 {
        self.buf.read(self.pos)
    }

    pub fn y(&self) -> f32 {
        self.buf.read(self.pos + 4)
    }
}

impl<'a> InlineStruct<'a> for Vec2<'a> {
    const SIZE: usize = 8;
    const ALIGN: usize = 4;

    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Vec2 { buf, pos }
    }

    fn location(&self) -> (ByteBuffer<'a>, usize) {
        (self.buf, self.pos)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Scene<'a>(Table<'a>);

impl<'a> Scene<'a> {
    pub const NAME: VOffset = field_voffset(0);
    pub const MAIN_TYPE: VOffset = field_voffset(1);
    pub const MAIN: VOffset = field_voffset(2);
    pub const POINTS: VOffset = field_voffset(3);
    pub const TAGS: VOffset = field_voffset(4);
    pub const SCORES: VOffset = field_voffset(5);
    pub const GRID: VOffset = field_voffset(6);
    pub const PATH: VOffset = field_voffset(7);
    pub const ITEMS_TYPE: VOffset = field_voffset(8);
    pub const ITEMS: VOffset = field_voffset(9);
    pub const CHILD: VOffset = field_voffset(10);

    pub fn name(&self) -> Option<Cow<'a, str>> {
        self.0.string(Self::NAME)
    }

    pub fn main_type(&self) -> Shape {
        Shape::from_repr(self.0.get(Self::MAIN_TYPE, 0))
    }

    pub fn main(&self) -> Option<ShapeValue<'a>> {
        self.0.union_value(Self::MAIN_TYPE, Self::MAIN)
    }

    pub fn main_union(&self) -> Option<Union<'a, Shape>> {
        self.0.union(Self::MAIN_TYPE, Self::MAIN)
    }

    pub fn points(&self) -> Option<TableVector<'a, Point<'a>>> {
        self.0.vector(Self::POINTS)
    }

    pub fn tags(&self) -> Option<StringVector<'a>> {
        self.0.vector(Self::TAGS)
    }

    pub fn scores(&self) -> Option<ScalarVector<'a, i32>> {
        self.0.vector(Self::SCORES)
    }

    pub fn grid(&self) -> Option<VectorVector<'a, ScalarVector<'a, i32>>> {
        self.0.vector(Self::GRID)
    }

    pub fn path(&self) -> Option<StructVector<'a, Vec2<'a>>> {
        self.0.vector(Self::PATH)
    }

    pub fn items(&self) -> Option<UnionVector<'a, ShapeValue<'a>>> {
        self.0.union_vector(Self::ITEMS_TYPE, Self::ITEMS)
    }

    pub fn child(&self) -> Option<Scene<'a>> {
        self.0.table(Self::CHILD)
    }
}

impl<'a> TableView<'a> for Scene<'a> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Scene(Table::new(buf, pos))
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset> {
        let t = &self.0;
        let name = t.clone_string_field(builder, Self::NAME)?;
        let main = t.clone_union_field::<ShapeValue>(builder, Self::MAIN_TYPE, Self::MAIN)?;
        let points = t.clone_vector_field::<TableVector<Point>>(builder, Self::POINTS)?;
        let tags = t.clone_vector_field::<StringVector>(builder, Self::TAGS)?;
        let scores = t.clone_vector_field::<ScalarVector<i32>>(builder, Self::SCORES)?;
        let grid =
            t.clone_vector_field::<VectorVector<ScalarVector<i32>>>(builder, Self::GRID)?;
        let path = t.clone_vector_field::<StructVector<Vec2>>(builder, Self::PATH)?;
        let items =
            t.clone_union_vector_field::<ShapeValue>(builder, Self::ITEMS_TYPE, Self::ITEMS)?;
        let child = t.clone_table_field::<Scene>(builder, Self::CHILD)?;

        builder.start_table()?;
        if let Some(name) = name {
            builder.add_offset_field(Self::NAME, name)?;
        }
        if main != 0 {
            builder.add_offset_field(Self::MAIN, main)?;
        }
        let vectors = [
            (Self::POINTS, points),
            (Self::TAGS, tags),
            (Self::SCORES, scores),
            (Self::GRID, grid),
            (Self::PATH, path),
        ];
        for (voffset, vector) in vectors {
            if let Some(vector) = vector {
                builder.add_offset_field(voffset, vector)?;
            }
        }
        if let Some((kinds, values)) = items {
            builder.add_offset_field(Self::ITEMS_TYPE, kinds)?;
            builder.add_offset_field(Self::ITEMS, values)?;
        }
        if let Some(child) = child {
            builder.add_offset_field(Self::CHILD, child)?;
        }
        if main != 0 {
            builder.add_scalar(Self::MAIN_TYPE, self.main_type().to_repr(), 0)?;
        }
        builder.end_table()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeData {
    Point(i32, i32),
    Label(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneData {
    pub name: Option<String>,
    pub main: Option<ShapeData>,
    pub points: Vec<(i32, i32)>,
    pub tags: Vec<String>,
    pub scores: Vec<i32>,
    pub grid: Vec<Vec<i32>>,
    pub path: Vec<(f32, f32)>,
    pub items: Vec<ShapeData>,
    pub child: Option<Box<SceneData>>,
}

pub fn write_scalars<T: Scalar>(builder: &mut Builder, values: &[T]) -> VectorOffset {
    builder.start_vector(T::SIZE, values.len(), T::SIZE).unwrap();
    for value in values.iter().rev() {
        builder.push(*value).unwrap();
    }
    builder.end_vector().unwrap()
}

pub fn write_offsets(builder: &mut Builder, offsets: &[u32]) -> VectorOffset {
    builder.start_vector(4, offsets.len(), 4).unwrap();
    for offset in offsets.iter().rev() {
        builder.add_offset(*offset).unwrap();
    }
    builder.end_vector().unwrap()
}

pub fn write_strings<S: AsRef<str>>(builder: &mut Builder, values: &[S]) -> VectorOffset {
    let offsets: Vec<u32> = values
        .iter()
        .map(|s| builder.create_string(s.as_ref()).unwrap().value())
        .collect();
    write_offsets(builder, &offsets)
}

pub fn write_point(builder: &mut Builder, x: i32, y: i32) -> TableOffset {
    builder.start_table().unwrap();
    builder.add_scalar(Point::X, x, 0).unwrap();
    builder.add_scalar(Point::Y, y, 0).unwrap();
    builder.end_table().unwrap()
}

pub fn write_label(builder: &mut Builder, text: &str) -> TableOffset {
    let text = builder.create_string(text).unwrap();
    builder.start_table().unwrap();
    builder.add_offset_field(Label::TEXT, text).unwrap();
    builder.end_table().unwrap()
}

pub fn write_shape(builder: &mut Builder, shape: &ShapeData) -> (Shape, TableOffset) {
    match shape {
        ShapeData::Point(x, y) => (Shape::Point, write_point(builder, *x, *y)),
        ShapeData::Label(text) => (Shape::Label, write_label(builder, text)),
    }
}

pub fn write_scene(builder: &mut Builder, scene: &SceneData) -> TableOffset {
    let child = scene
        .child
        .as_ref()
        .map(|child| write_scene(builder, child));
    let name = scene
        .name
        .as_ref()
        .map(|name| builder.create_string(name).unwrap());
    let main = scene.main.as_ref().map(|shape| write_shape(builder, shape));

    let points: Vec<u32> = scene
        .points
        .iter()
        .map(|&(x, y)| write_point(builder, x, y).value())
        .collect();
    let points = write_offsets(builder, &points);
    let tags = write_strings(builder, &scene.tags);
    let scores = write_scalars(builder, &scene.scores);

    let rows: Vec<u32> = scene
        .grid
        .iter()
        .map(|row| write_scalars(builder, row).value())
        .collect();
    let grid = write_offsets(builder, &rows);

    builder.start_vector(8, scene.path.len(), 4).unwrap();
    for &(x, y) in scene.path.iter().rev() {
        builder.push(y).unwrap();
        builder.push(x).unwrap();
    }
    let path = builder.end_vector().unwrap();

    let (kinds, values): (Vec<u8>, Vec<u32>) = scene
        .items
        .iter()
        .map(|item| {
            let (kind, offset) = write_shape(builder, item);
            (kind.to_repr(), offset.value())
        })
        .unzip();
    let items = write_offsets(builder, &values);
    let item_kinds = write_scalars(builder, &kinds);

    builder.start_table().unwrap();
    if let Some(name) = name {
        builder.add_offset_field(Scene::NAME, name).unwrap();
    }
    if let Some((_, offset)) = main {
        builder.add_offset_field(Scene::MAIN, offset).unwrap();
    }
    builder.add_offset_field(Scene::POINTS, points).unwrap();
    builder.add_offset_field(Scene::TAGS, tags).unwrap();
    builder.add_offset_field(Scene::SCORES, scores).unwrap();
    builder.add_offset_field(Scene::GRID, grid).unwrap();
    builder.add_offset_field(Scene::PATH, path).unwrap();
    builder.add_offset_field(Scene::ITEMS_TYPE, item_kinds).unwrap();
    builder.add_offset_field(Scene::ITEMS, items).unwrap();
    if let Some(child) = child {
        builder.add_offset_field(Scene::CHILD, child).unwrap();
    }
    if let Some((kind, _)) = main {
        builder.add_scalar(Scene::MAIN_TYPE, kind.to_repr(), 0).unwrap();
    }
    builder.end_table().unwrap()
}

/// Writes `scene` as the root of a new buffer.
pub fn scene_bytes(scene: &SceneData) -> Vec<u8> {
    let mut builder = Builder::new();
    let root = write_scene(&mut builder, scene);
    builder.finish(root).unwrap();
    builder.into_bytes().unwrap()
}

pub fn read_shape(value: ShapeValue<'_>) -> ShapeData {
    match value {
        ShapeValue::Point(point) => ShapeData::Point(point.x(), point.y()),
        ShapeValue::Label(label) => ShapeData::Label(label.text().unwrap_or_default().into_owned()),
        other => panic!("unexpected shape {:?}", other),
    }
}

pub fn read_scene(scene: &Scene<'_>) -> SceneData {
    SceneData {
        name: scene.name().map(Cow::into_owned),
        main: scene.main().map(read_shape),
        points: scene
            .points()
            .map(|v| v.iter().map(|p| (p.x(), p.y())).collect())
            .unwrap_or_default(),
        tags: scene
            .tags()
            .map(|v| v.iter().map(Cow::into_owned).collect())
            .unwrap_or_default(),
        scores: scene
            .scores()
            .map(|v| v.iter().collect())
            .unwrap_or_default(),
        grid: scene
            .grid()
            .map(|v| v.iter().map(|row| row.iter().collect()).collect())
            .unwrap_or_default(),
        path: scene
            .path()
            .map(|v| v.iter().map(|p| (p.x(), p.y())).collect())
            .unwrap_or_default(),
        items: scene
            .items()
            .map(|v| v.iter().map(read_shape).collect())
            .unwrap_or_default(),
        child: scene.child().map(|child| Box::new(read_scene(&child))),
    }
}

/// A chain of `depth` scenes, each the child of the one before.
pub fn scene_chain(depth: usize) -> SceneData {
    let mut scene = SceneData {
        name: Some("leaf".to_string()),
        scores: vec![1, 2, 3],
        ..SceneData::default()
    };
    for level in 1..depth {
        scene = SceneData {
            name: Some(format!("level-{}", level)),
            child: Some(Box::new(scene)),
            ..SceneData::default()
        };
    }
    scene
}

/// Number of scenes in a chain.
pub fn chain_len(scene: &SceneData) -> usize {
    1 + scene.child.as_ref().map_or(0, |child| chain_len(child))
}
