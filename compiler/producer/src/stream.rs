//! The lazy event stream.
//!
//! [`EventStream`] walks the descriptor set as an explicit work stack. Each
//! call to `next` pops exactly one pending step, converts the descriptor
//! material that step needs, and pushes the follow-up steps in reverse
//! order. The stream is finite: it ends after the `FileExited` event of the
//! last generated file, or immediately after the first error.

use std::collections::HashSet;
use std::path::PathBuf;

use events::Event;
use model::{
    EnumConstant, Field, FieldName, MessageType, OneofGroup, OptionValue, Rpc, ServiceName,
    Syntax, TypeName,
};
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto, ServiceDescriptorProto};

use crate::convert::{self, element_path};
use crate::docs::{tag, DocMap};
use crate::{options, Result, TypeIndex};

/// One pending unit of traversal work.
enum Step<'a> {
    EnterFile(&'a FileDescriptorProto),
    FileOption { file: PathBuf, option: OptionValue },
    ExitFile(PathBuf),
    EnterMessage { message: &'a DescriptorProto, name: TypeName, path: Vec<i32>, syntax: Syntax },
    TypeOption { type_name: TypeName, option: OptionValue },
    ExitMessage(TypeName),
    EnterOneof(OneofGroup),
    ExitOneof(OneofGroup),
    EnterField(Box<Field>),
    FieldOption { declaring_type: TypeName, field: FieldName, option: OptionValue },
    ExitField { declaring_type: TypeName, field: FieldName },
    EnterEnum { enumeration: &'a EnumDescriptorProto, name: TypeName, path: Vec<i32> },
    EnumOption { type_name: TypeName, option: OptionValue },
    EnumConstant { type_name: TypeName, constant: EnumConstant },
    ExitEnum(TypeName),
    EnterService { service: &'a ServiceDescriptorProto, package: String, path: Vec<i32> },
    ServiceOption { service: ServiceName, option: OptionValue },
    Rpc { service: ServiceName, rpc: Rpc },
    ExitService(ServiceName),
}

/// Lazy, finite sequence of compiler events over one request.
///
/// Implements `Iterator<Item = Result<Event>>`; after an `Err` item the
/// stream yields nothing further.
pub struct EventStream<'a> {
    index: TypeIndex,
    stack: Vec<Step<'a>>,
    docs: DocMap,
    failed: bool,
}

impl<'a> EventStream<'a> {
    /// Create the stream for a request.
    ///
    /// Builds the type index over every file in the request (a name walk,
    /// no field resolution) and queues the files listed in
    /// `file_to_generate`, preserving request order.
    pub fn new(request: &'a CodeGeneratorRequest) -> Self {
        let index = TypeIndex::build(&request.proto_file);
        let to_generate: HashSet<&str> =
            request.file_to_generate.iter().map(String::as_str).collect();
        let mut stack: Vec<Step<'a>> = request
            .proto_file
            .iter()
            .filter(|file| to_generate.contains(file.name()))
            .map(Step::EnterFile)
            .collect();
        stack.reverse();
        tracing::debug!(queued = stack.len(), "event stream ready");
        Self { index, stack, docs: DocMap::default(), failed: false }
    }

    /// The type index built from the request, covering imports as well.
    pub fn type_index(&self) -> &TypeIndex { &self.index }

    fn emit(&mut self, step: Step<'a>) -> Result<Event> {
        match step {
            Step::EnterFile(file) => self.enter_file(file),
            Step::FileOption { file, option } => Ok(Event::FileOptionDiscovered { file, option }),
            Step::ExitFile(path) => Ok(Event::FileExited(path)),
            Step::EnterMessage { message, name, path, syntax } => {
                self.enter_message(message, name, path, syntax)
            }
            Step::TypeOption { type_name, option } => {
                Ok(Event::TypeOptionDiscovered { type_name, option })
            }
            Step::ExitMessage(name) => Ok(Event::TypeExited(name)),
            Step::EnterOneof(group) => Ok(Event::OneofGroupEntered(group)),
            Step::ExitOneof(group) => Ok(Event::OneofGroupExited(group)),
            Step::EnterField(field) => self.enter_field(*field),
            Step::FieldOption { declaring_type, field, option } => {
                Ok(Event::FieldOptionDiscovered { declaring_type, field, option })
            }
            Step::ExitField { declaring_type, field } => {
                Ok(Event::FieldExited { declaring_type, field })
            }
            Step::EnterEnum { enumeration, name, path } => {
                self.enter_enum(enumeration, name, &path)
            }
            Step::EnumOption { type_name, option } => {
                Ok(Event::EnumOptionDiscovered { type_name, option })
            }
            Step::EnumConstant { type_name, constant } => {
                Ok(Event::EnumConstantDiscovered { type_name, constant })
            }
            Step::ExitEnum(name) => Ok(Event::EnumExited(name)),
            Step::EnterService { service, package, path } => {
                self.enter_service(service, &package, &path)
            }
            Step::ServiceOption { service, option } => {
                Ok(Event::ServiceOptionDiscovered { service, option })
            }
            Step::Rpc { service, rpc } => Ok(Event::RpcDiscovered { service, rpc }),
            Step::ExitService(name) => Ok(Event::ServiceExited(name)),
        }
    }

    fn enter_file(&mut self, file: &'a FileDescriptorProto) -> Result<Event> {
        let converted = convert::convert_file(file)?;
        tracing::debug!(file = %converted.path.display(), "entering file");
        self.docs = DocMap::new(file.source_code_info.as_ref());
        let path = converted.path.clone();
        let package = converted.package.clone();
        let syntax = converted.syntax;

        self.stack.push(Step::ExitFile(path.clone()));
        for (service_index, service) in file.service.iter().enumerate().rev() {
            self.stack.push(Step::EnterService {
                service,
                package: package.clone(),
                path: vec![tag::FILE_SERVICE, service_index as i32],
            });
        }
        for (enum_index, enumeration) in file.enum_type.iter().enumerate().rev() {
            self.stack.push(Step::EnterEnum {
                enumeration,
                name: TypeName::new(&package, enumeration.name()),
                path: vec![tag::FILE_ENUM_TYPE, enum_index as i32],
            });
        }
        for (message_index, message) in file.message_type.iter().enumerate().rev() {
            self.stack.push(Step::EnterMessage {
                message,
                name: TypeName::new(&package, message.name()),
                path: vec![tag::FILE_MESSAGE_TYPE, message_index as i32],
                syntax,
            });
        }
        for option in converted.options.iter().rev() {
            self.stack.push(Step::FileOption { file: path.clone(), option: option.clone() });
        }
        Ok(Event::FileEntered(converted))
    }

    fn enter_message(
        &mut self,
        message: &'a DescriptorProto,
        name: TypeName,
        path: Vec<i32>,
        syntax: Syntax,
    ) -> Result<Event> {
        let synthetic = synthetic_oneofs(message);
        let fields = message
            .field
            .iter()
            .enumerate()
            .map(|(field_index, field)| {
                let oneof_name = field
                    .oneof_index
                    .filter(|_| !field.proto3_optional())
                    .and_then(|oneof_index| message.oneof_decl.get(oneof_index as usize))
                    .map(|decl| decl.name().to_string());
                convert::convert_field(
                    field,
                    &name,
                    oneof_name,
                    syntax,
                    &self.index,
                    self.docs.doc_for(&element_path(&path, tag::MESSAGE_FIELD, field_index)),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let oneofs: Vec<OneofGroup> = message
            .oneof_decl
            .iter()
            .enumerate()
            .filter(|(oneof_index, _)| !synthetic.contains(&(*oneof_index as i32)))
            .map(|(_, decl)| OneofGroup {
                name: decl.name().to_string(),
                declaring_type: name.clone(),
            })
            .collect();

        let nested_messages: Vec<&DescriptorProto> = message
            .nested_type
            .iter()
            .filter(|nested| !nested.options.as_ref().map(|o| o.map_entry()).unwrap_or(false))
            .collect();
        let nested_enums: Vec<&EnumDescriptorProto> = message.enum_type.iter().collect();

        let converted = MessageType {
            name: name.clone(),
            fields: fields.clone(),
            oneofs: oneofs.clone(),
            nested_messages: nested_messages.iter().map(|m| name.nested(m.name())).collect(),
            nested_enums: nested_enums.iter().map(|e| name.nested(e.name())).collect(),
            options: options::message_options(message.options.as_ref()),
            doc: self.docs.doc_for(&path),
        };

        self.stack.push(Step::ExitMessage(name.clone()));
        for step in field_steps(fields, &oneofs).into_iter().rev() {
            self.stack.push(step);
        }
        for (enum_index, enumeration) in message.enum_type.iter().enumerate().rev() {
            self.stack.push(Step::EnterEnum {
                enumeration,
                name: name.nested(enumeration.name()),
                path: element_path(&path, tag::MESSAGE_ENUM_TYPE, enum_index),
            });
        }
        for (nested_index, nested) in message.nested_type.iter().enumerate().rev() {
            if nested.options.as_ref().map(|o| o.map_entry()).unwrap_or(false) {
                continue;
            }
            self.stack.push(Step::EnterMessage {
                message: nested,
                name: name.nested(nested.name()),
                path: element_path(&path, tag::MESSAGE_NESTED_TYPE, nested_index),
                syntax,
            });
        }
        for option in converted.options.iter().rev() {
            self.stack
                .push(Step::TypeOption { type_name: name.clone(), option: option.clone() });
        }
        Ok(Event::TypeEntered(converted))
    }

    fn enter_field(&mut self, field: Field) -> Result<Event> {
        let declaring_type = field.declaring_type.clone();
        let field_name = field.name.clone();
        self.stack.push(Step::ExitField {
            declaring_type: declaring_type.clone(),
            field: field_name.clone(),
        });
        for option in field.options.iter().rev() {
            self.stack.push(Step::FieldOption {
                declaring_type: declaring_type.clone(),
                field: field_name.clone(),
                option: option.clone(),
            });
        }
        Ok(Event::FieldEntered(field))
    }

    fn enter_enum(
        &mut self,
        enumeration: &'a EnumDescriptorProto,
        name: TypeName,
        path: &[i32],
    ) -> Result<Event> {
        let converted = convert::convert_enum(enumeration, name.clone(), &self.docs, path);
        self.stack.push(Step::ExitEnum(name.clone()));
        for constant in converted.constants.iter().rev() {
            self.stack.push(Step::EnumConstant {
                type_name: name.clone(),
                constant: constant.clone(),
            });
        }
        for option in converted.options.iter().rev() {
            self.stack
                .push(Step::EnumOption { type_name: name.clone(), option: option.clone() });
        }
        Ok(Event::EnumEntered(converted))
    }

    fn enter_service(
        &mut self,
        service: &'a ServiceDescriptorProto,
        package: &str,
        path: &[i32],
    ) -> Result<Event> {
        let converted = convert::convert_service(service, package, &self.index, &self.docs, path)?;
        let name = converted.name.clone();
        self.stack.push(Step::ExitService(name.clone()));
        for rpc in converted.rpcs.iter().rev() {
            self.stack.push(Step::Rpc { service: name.clone(), rpc: rpc.clone() });
        }
        for option in converted.options.iter().rev() {
            self.stack.push(Step::ServiceOption { service: name.clone(), option: option.clone() });
        }
        Ok(Event::ServiceEntered(converted))
    }
}

impl Iterator for EventStream<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let step = self.stack.pop()?;
        match self.emit(step) {
            Ok(event) => Some(Ok(event)),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

/// Indexes of oneof declarations that exist only to model proto3 `optional`.
fn synthetic_oneofs(message: &DescriptorProto) -> HashSet<i32> {
    let mut synthetic: HashSet<i32> = message
        .field
        .iter()
        .filter(|field| field.proto3_optional())
        .filter_map(|field| field.oneof_index)
        .collect();
    // A oneof with any real member is not synthetic.
    for field in &message.field {
        if !field.proto3_optional() {
            if let Some(oneof_index) = field.oneof_index {
                synthetic.remove(&oneof_index);
            }
        }
    }
    synthetic
}

/// Lay out field steps in declaration order, bracketing runs of fields that
/// belong to the same oneof group with enter/exit steps.
fn field_steps<'a>(fields: Vec<Field>, oneofs: &[OneofGroup]) -> Vec<Step<'a>> {
    let mut steps = Vec::new();
    let mut open: Option<OneofGroup> = None;
    for field in fields {
        let group = field
            .oneof_name
            .as_deref()
            .and_then(|oneof| oneofs.iter().find(|g| g.name == oneof))
            .cloned();
        if open != group {
            if let Some(previous) = open.take() {
                steps.push(Step::ExitOneof(previous));
            }
            if let Some(next) = group.clone() {
                steps.push(Step::EnterOneof(next));
            }
            open = group;
        }
        steps.push(Step::EnterField(Box::new(field)));
    }
    if let Some(last) = open {
        steps.push(Step::ExitOneof(last));
    }
    steps
}
