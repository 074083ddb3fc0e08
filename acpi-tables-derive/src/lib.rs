use proc_macro::TokenStream;
use quote::quote;
use std::str::FromStr;
use syn::{parse, Expr, Field, Fields, GenericArgument, Ident, ItemStruct, Lit, PathArguments, Type};

#[proc_macro_derive(ACPI, attributes(acpi))]
pub fn acpi_record(input: TokenStream) -> TokenStream {
    let ast: ItemStruct = parse(input).unwrap();

    let struct_name = ast.ident;

    let mut field_getters = vec![];
    let mut field_names = vec![];
    let mut field_ctors = vec![];
    if let Fields::Named(fields) = ast.fields {
        for field in &fields.named {
            let func_name = field.ident.as_ref().unwrap();
            field_names.push(func_name.clone());

            let ty = &field.ty;
            let tydef = get_type_def(ty);
            let ret_ty = ty_ref(&tydef);
            let method = method_ref(func_name, &tydef);
            field_getters.push(quote! {
                pub fn #func_name(&self) -> #ret_ty {
                    #method
                }
            });

            let ctor = field_ctor(field, &tydef);
            field_ctors.push(ctor);
        }
    }

    let struct_impl = quote! {
        impl #struct_name {
            #(#field_getters)*

            pub fn from_record(record: &Bytes) -> Result<Self, Error> {
                let mut body = record.clone();

                #(#field_ctors)*

                Ok(#struct_name {
                    #(#field_names),*
                })
            }
        }
    };

    struct_impl.into()
}

#[derive(Debug)]
struct TypeDef {
    ident: Ident,
    array_length: i32,
    vector: bool,
    copy_trait: bool,
}

impl TypeDef {
    fn array(&self) -> bool {
        self.array_length > -1
    }

    fn enumerable(&self) -> bool {
        self.array() || self.vector
    }
}

fn ty_ref(tydef: &TypeDef) -> proc_macro2::TokenStream {
    let ret_ty = &tydef.ident;

    if tydef.enumerable() {
        quote! { &[#ret_ty] }
    } else if !tydef.copy_trait {
        quote! { &#ret_ty }
    } else {
        quote! { #ret_ty }
    }
}

fn method_ref(func_name: &Ident, tydef: &TypeDef) -> proc_macro2::TokenStream {
    if tydef.enumerable() {
        quote! { self.#func_name.as_slice() }
    } else if !tydef.copy_trait {
        quote! { &self.#func_name }
    } else {
        quote! { self.#func_name }
    }
}

fn field_ctor(field: &Field, tydef: &TypeDef) -> proc_macro2::TokenStream {
    let func_name = &field.ident.as_ref().unwrap();

    if has_acpi_attr(field, "trailer") {
        return quote! {
            let #func_name = body.split_off(0).to_vec();
        };
    }

    if has_acpi_attr(field, "scopes") {
        let elem_ty = &tydef.ident;
        return quote! {
            let #func_name = #elem_ty::parse_all(&body)?;
        };
    }

    if is_u8(&tydef.ident) {
        let method = Ident::new("get_u8", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 1)
    } else if is_u16(&tydef.ident) {
        let method = Ident::new("get_u16_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 2)
    } else if is_u32(&tydef.ident) {
        let method = Ident::new("get_u32_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 4)
    } else if is_u64(&tydef.ident) {
        let method = Ident::new("get_u64_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 8)
    } else if is_i8(&tydef.ident) {
        let method = Ident::new("get_i8", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 1)
    } else if is_i16(&tydef.ident) {
        let method = Ident::new("get_i16_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 2)
    } else if is_i32(&tydef.ident) {
        let method = Ident::new("get_i32_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 4)
    } else if is_i64(&tydef.ident) {
        let method = Ident::new("get_i64_le", proc_macro2::Span::call_site());
        field_ctor_number(field, tydef, &method, 8)
    } else {
        unimplemented!(
            "Not supported yet. Field `{}`",
            field.ident.as_ref().unwrap().to_string()
        );
    }
}

fn field_ctor_number(
    field: &Field,
    tydef: &TypeDef,
    method: &Ident,
    byte_size: usize,
) -> proc_macro2::TokenStream {
    let func_name = &field.ident.as_ref().unwrap();

    if tydef.array() {
        let length = tydef.array_length as usize;
        quote! {
            if body.remaining() < (#length * #byte_size) {
                return Err(Error::MalformedRecord {
                    need: #length * #byte_size,
                    have: body.remaining(),
                });
            }
            let #func_name = {
                let mut arr = [0; #length];
                for idx in 0..#length {
                    arr[idx] = body.#method();
                }
                arr
            };
        }
    } else {
        quote! {
            if body.remaining() < #byte_size {
                return Err(Error::MalformedRecord {
                    need: #byte_size,
                    have: body.remaining(),
                });
            }
            let #func_name = body.#method();
        }
    }
}

fn has_acpi_attr(field: &Field, name: &str) -> bool {
    let mut found = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("acpi")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(name) {
                found = true;
            }
            Ok(())
        });
    }

    found
}

fn get_array_len(len: &Expr) -> Option<i32> {
    if let Expr::Lit(expr) = len {
        if let Lit::Int(i) = &expr.lit {
            return i32::from_str(i.base10_digits()).ok();
        }
    }

    None
}

fn get_type_def(ty: &Type) -> TypeDef {
    match ty {
        Type::Array(a) => {
            let mut def = get_type_def(&a.elem);
            def.array_length = get_array_len(&a.len).unwrap();
            def
        }
        Type::Path(p) => match p.path.get_ident() {
            Some(i) => {
                let copy_trait = is_copy_trait(i);
                TypeDef {
                    ident: i.clone(),
                    array_length: -1,
                    vector: false,
                    copy_trait,
                }
            }
            _ => {
                let q_ty = &p.path.segments[0].ident;
                if let PathArguments::AngleBracketed(arg) = &p.path.segments[0].arguments {
                    if let GenericArgument::Type(arg_ty) = &arg.args[0] {
                        let mut def = get_type_def(arg_ty);

                        if is_vector(q_ty) {
                            def.vector = true;
                        }

                        return def;
                    }
                }

                unimplemented!("Not supported yet. Type `{}`", q_ty.to_string());
            }
        },
        _ => {
            unimplemented!("Not supported yet.");
        }
    }
}

fn is_copy_trait(ident: &Ident) -> bool {
    matches!(
        ident.to_string().as_str(),
        "u8" | "u16" | "u32" | "u64" | "i8" | "i16" | "i32" | "i64"
    )
}

fn is_i16(ident: &Ident) -> bool {
    is_type(ident, "i16")
}

fn is_i32(ident: &Ident) -> bool {
    is_type(ident, "i32")
}

fn is_i64(ident: &Ident) -> bool {
    is_type(ident, "i64")
}

fn is_i8(ident: &Ident) -> bool {
    is_type(ident, "i8")
}

fn is_u16(ident: &Ident) -> bool {
    is_type(ident, "u16")
}

fn is_u32(ident: &Ident) -> bool {
    is_type(ident, "u32")
}

fn is_u64(ident: &Ident) -> bool {
    is_type(ident, "u64")
}

fn is_u8(ident: &Ident) -> bool {
    is_type(ident, "u8")
}

fn is_vector(ident: &Ident) -> bool {
    is_type(ident, "Vec")
}

fn is_type(ident: &Ident, keyword: &str) -> bool {
    let ident_s = ident.to_string();
    ident_s.as_str() == keyword
}
