//! Type registry: the canonical enumerations of the metadata model and the
//! static facts attached to them

use crate::enums::{nrrd_enum, NrrdEnum};

/// Maximum number of axes an array may declare
pub const DIM_MAX: usize = 16;

/// Maximum dimension of a coordinate space
pub const SPACE_DIM_MAX: usize = 8;

/// Widest fixed-size element type, in bytes
pub const TYPE_SIZE_MAX: usize = 8;

/// Rust type of the widest element type
pub type TypeBiggest = f64;

nrrd_enum! {
    /// Element types an array may hold
    #[derive(Default)]
    pub enum Type: "type" {
        max = 11,
        last = 12,
        unknown = Some(Type::Unknown),
        #[default]
        Unknown = 0 => "(unknown_type)",
        /// Signed 8-bit integer
        Char = 1 => "signed char",
        /// Unsigned 8-bit integer
        UChar = 2 => "unsigned char",
        /// Signed 16-bit integer
        Short = 3 => "short",
        /// Unsigned 16-bit integer
        UShort = 4 => "unsigned short",
        /// Signed 32-bit integer
        Int = 5 => "int",
        /// Unsigned 32-bit integer
        UInt = 6 => "unsigned int",
        /// Signed 64-bit integer
        LLong = 7 => "long long int",
        /// Unsigned 64-bit integer
        ULLong = 8 => "unsigned long long int",
        /// 32-bit floating point
        Float = 9 => "float",
        /// 64-bit floating point
        Double = 10 => "double",
        /// Opaque element of caller-declared width
        Block = 11 => "block",
    }
}

impl Type {
    /// Size in bytes of one element; 0 for `Unknown` and `Block`
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Type::Unknown | Type::Block => 0,
            Type::Char | Type::UChar => 1,
            Type::Short | Type::UShort => 2,
            Type::Int | Type::UInt | Type::Float => 4,
            Type::LLong | Type::ULLong | Type::Double => 8,
        }
    }

    /// Whether values of this type can never be non-existent.
    ///
    /// Blocks count as integral.
    pub fn is_integral(&self) -> bool {
        !matches!(self, Type::Unknown | Type::Float | Type::Double)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }
}

nrrd_enum! {
    /// Sample centering along an axis
    #[derive(Default)]
    pub enum Center: "centering" {
        max = 2,
        last = 3,
        unknown = Some(Center::Unknown),
        #[default]
        Unknown = 0 => "(unknown_center)",
        /// Samples sit on grid nodes
        Node = 1 => "node",
        /// Samples fill cells
        Cell = 2 => "cell",
    }
}

nrrd_enum! {
    /// Semantic role of an axis
    #[derive(Default)]
    pub enum Kind: "kind" {
        max = 31,
        last = 32,
        unknown = Some(Kind::Unknown),
        #[default]
        Unknown = 0 => "(unknown_kind)",
        Domain = 1 => "domain",
        Space = 2 => "space",
        Time = 3 => "time",
        List = 4 => "list",
        Point = 5 => "point",
        Vector = 6 => "vector",
        CovariantVector = 7 => "covariant-vector",
        Normal = 8 => "normal",
        Stub = 9 => "stub",
        Scalar = 10 => "scalar",
        Complex = 11 => "complex",
        Vector2D = 12 => "2-vector",
        Color3 = 13 => "3-color",
        RgbColor = 14 => "RGB-color",
        HsvColor = 15 => "HSV-color",
        XyzColor = 16 => "XYZ-color",
        Color4 = 17 => "4-color",
        RgbaColor = 18 => "RGBA-color",
        Vector3D = 19 => "3-vector",
        Gradient3D = 20 => "3-gradient",
        Normal3D = 21 => "3-normal",
        Vector4D = 22 => "4-vector",
        Quaternion = 23 => "quaternion",
        SymMatrix2D = 24 => "2D-symmetric-matrix",
        MaskedSymMatrix2D = 25 => "2D-masked-symmetric-matrix",
        Matrix2D = 26 => "2D-matrix",
        MaskedMatrix2D = 27 => "2D-masked-matrix",
        SymMatrix3D = 28 => "3D-symmetric-matrix",
        MaskedSymMatrix3D = 29 => "3D-masked-symmetric-matrix",
        Matrix3D = 30 => "3D-matrix",
        MaskedMatrix3D = 31 => "3D-masked-matrix",
    }
}

impl Kind {
    /// Number of samples an axis of this kind must have; 0 if unconstrained
    pub fn size(&self) -> usize {
        match self {
            Kind::Unknown
            | Kind::Domain
            | Kind::Space
            | Kind::Time
            | Kind::List
            | Kind::Point
            | Kind::Vector
            | Kind::CovariantVector
            | Kind::Normal => 0,
            Kind::Stub | Kind::Scalar => 1,
            Kind::Complex | Kind::Vector2D => 2,
            Kind::Color3
            | Kind::RgbColor
            | Kind::HsvColor
            | Kind::XyzColor
            | Kind::Vector3D
            | Kind::Gradient3D
            | Kind::Normal3D
            | Kind::SymMatrix2D => 3,
            Kind::Color4
            | Kind::RgbaColor
            | Kind::Vector4D
            | Kind::Quaternion
            | Kind::MaskedSymMatrix2D
            | Kind::Matrix2D => 4,
            Kind::MaskedMatrix2D => 5,
            Kind::SymMatrix3D => 6,
            Kind::MaskedSymMatrix3D => 7,
            Kind::Matrix3D => 9,
            Kind::MaskedMatrix3D => 10,
        }
    }
}

nrrd_enum! {
    /// Coordinate systems an array may be registered into
    #[derive(Default)]
    pub enum Space: "space" {
        max = 12,
        last = 13,
        unknown = Some(Space::Unknown),
        #[default]
        Unknown = 0 => "(unknown_space)",
        RightAnteriorSuperior = 1 => "right-anterior-superior",
        LeftAnteriorSuperior = 2 => "left-anterior-superior",
        LeftPosteriorSuperior = 3 => "left-posterior-superior",
        RightAnteriorSuperiorTime = 4 => "right-anterior-superior-time",
        LeftAnteriorSuperiorTime = 5 => "left-anterior-superior-time",
        LeftPosteriorSuperiorTime = 6 => "left-posterior-superior-time",
        ScannerXyz = 7 => "scanner-xyz",
        ScannerXyzTime = 8 => "scanner-xyz-time",
        RightHanded3D = 9 => "3D-right-handed",
        LeftHanded3D = 10 => "3D-left-handed",
        RightHanded3DTime = 11 => "3D-right-handed-time",
        LeftHanded3DTime = 12 => "3D-left-handed-time",
    }
}

impl Space {
    /// Expected dimension of this space; 0 for `Unknown`.
    ///
    /// `Unknown` legitimately has no expected dimension, which is not an
    /// error.
    pub fn dimension(&self) -> usize {
        match self {
            Space::Unknown => 0,
            Space::RightAnteriorSuperior
            | Space::LeftAnteriorSuperior
            | Space::LeftPosteriorSuperior
            | Space::ScannerXyz
            | Space::RightHanded3D
            | Space::LeftHanded3D => 3,
            Space::RightAnteriorSuperiorTime
            | Space::LeftAnteriorSuperiorTime
            | Space::LeftPosteriorSuperiorTime
            | Space::ScannerXyzTime
            | Space::RightHanded3DTime
            | Space::LeftHanded3DTime => 4,
        }
    }
}

/// Expected dimension of a raw space value; 0 for unknown or out-of-range
pub fn space_dimension(space: i32) -> usize {
    Space::from_value(space).map_or(0, |s| s.dimension())
}

nrrd_enum! {
    /// Identifiers for every metadata field, in checking order
    pub enum Field: "field" {
        max = 32,
        last = 33,
        unknown = Some(Field::Unknown),
        Unknown = 0 => "(unknown_field)",
        Comment = 1 => "comment",
        Content = 2 => "content",
        Number = 3 => "number",
        Type = 4 => "type",
        BlockSize = 5 => "block size",
        Dimension = 6 => "dimension",
        Space = 7 => "space",
        SpaceDimension = 8 => "space dimension",
        Sizes = 9 => "sizes",
        Spacings = 10 => "spacings",
        Thicknesses = 11 => "thicknesses",
        AxisMins = 12 => "axis mins",
        AxisMaxs = 13 => "axis maxs",
        SpaceDirections = 14 => "space directions",
        Centers = 15 => "centers",
        Kinds = 16 => "kinds",
        Labels = 17 => "labels",
        Units = 18 => "units",
        Min = 19 => "min",
        Max = 20 => "max",
        OldMin = 21 => "old min",
        OldMax = 22 => "old max",
        Endian = 23 => "endian",
        Encoding = 24 => "encoding",
        LineSkip = 25 => "line skip",
        ByteSkip = 26 => "byte skip",
        KeyValue = 27 => "key/value",
        SampleUnits = 28 => "sample units",
        SpaceUnits = 29 => "space units",
        SpaceOrigin = 30 => "space origin",
        MeasurementFrame = 31 => "measurement frame",
        DataFile = 32 => "data file",
    }
}

nrrd_enum! {
    /// Data encodings a writer may use
    pub enum Encoding: "encoding" {
        max = 5,
        last = 6,
        unknown = Some(Encoding::Unknown),
        Unknown = 0 => "(unknown_encoding)",
        Raw = 1 => "raw",
        Ascii = 2 => "ascii",
        Hex = 3 => "hex",
        Gzip = 4 => "gz",
        Bzip2 = 5 => "bz2",
    }
}

nrrd_enum! {
    /// File formats an array may be written as
    pub enum FormatType: "format" {
        max = 6,
        last = 7,
        unknown = Some(FormatType::Unknown),
        Unknown = 0 => "(unknown_format)",
        Nrrd = 1 => "nrrd",
        Pnm = 2 => "pnm",
        Png = 3 => "png",
        Vtk = 4 => "vtk",
        Text = 5 => "text",
        Eps = 6 => "eps",
    }
}

nrrd_enum! {
    /// Selector for one per-axis attribute
    pub enum AxisInfoField: "axis info" {
        max = 10,
        last = 11,
        unknown = Some(AxisInfoField::Unknown),
        Unknown = 0 => "(unknown_axis_info)",
        Size = 1 => "size",
        Spacing = 2 => "spacing",
        Thickness = 3 => "thickness",
        Min = 4 => "min",
        Max = 5 => "max",
        SpaceDirection = 6 => "space direction",
        Center = 7 => "center",
        Kind = 8 => "kind",
        Label = 9 => "label",
        Units = 10 => "units",
    }
}

nrrd_enum! {
    /// Whether the array data holds non-existent (non-finite) values
    #[derive(Default)]
    pub enum HasNonExist: "has non-exist" {
        max = 2,
        last = 3,
        unknown = Some(HasNonExist::Unknown),
        False = 0 => "false",
        True = 1 => "true",
        #[default]
        Unknown = 2 => "unknown",
    }
}

nrrd_enum! {
    /// Boundary behavior for resampling consumers
    pub enum Boundary: "boundary" {
        max = 4,
        last = 5,
        unknown = Some(Boundary::Unknown),
        Unknown = 0 => "(unknown_boundary)",
        Pad = 1 => "pad",
        Bleed = 2 => "bleed",
        Wrap = 3 => "wrap",
        Weight = 4 => "weight",
    }
}
