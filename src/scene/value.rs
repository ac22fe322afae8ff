use indexmap::IndexMap;

/// Ordered `key = value` properties of a scene section
pub type PropertyMap = IndexMap<String, Value>;

/// A property value from a text scene file
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Dictionary(Vec<(Value, Value)>),
    /// `Name( args )`, e.g. `Vector2( 1, 2 )` or `SubResource( 3 )`
    Constructor { name: String, args: Vec<Value> },
}

impl Value {
    /// Truthiness of the value: null, false, zero and empty
    /// strings/containers are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dictionary(entries) => !entries.is_empty(),
            Value::Constructor { .. } => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Resource ids are ints in older scenes and strings in newer ones
    pub fn as_id(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Arguments of a constructor with the given name
    pub fn constructor_args(&self, expected: &str) -> Option<&[Value]> {
        match self {
            Value::Constructor { name, args } if name == expected => Some(args),
            _ => None,
        }
    }

    /// Elements of an array literal or of a packed array constructor
    /// (`PoolIntArray( .. )`, `PackedInt32Array( .. )`, ...). Other
    /// constructors such as `Vector2( 1, 2 )` are not arrays.
    pub fn array_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            Value::Constructor { name, args } if name.ends_with("Array") => Some(args),
            _ => None,
        }
    }
}
